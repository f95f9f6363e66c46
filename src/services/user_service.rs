use sea_orm::{ColumnTrait, Order, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    auth::{Principal, Role, UserSummary, access},
    db::dao::{DaoBase, DaoLayerError, UserDao},
    db::entities::user,
    error::AppError,
};

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    /// Active users visible to the principal: everyone for managers and
    /// admins, only themselves for plain users.
    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<UserSummary>, AppError> {
        let scope = access::user_list_scope(principal);
        let mut pager = self.user_dao.find_iter(
            None,
            Some((user::Column::Name, Order::Asc)),
            move |query| {
                let query = query.filter(user::Column::IsActive.eq(true));
                match scope.clone() {
                    Some(scope) => query.filter(scope),
                    None => query,
                }
            },
        );

        let mut users = Vec::new();
        while let Some(response) = pager.next_page().await? {
            users.extend(response.data.iter().map(UserSummary::from));
        }
        Ok(users)
    }

    pub async fn get_user(
        &self,
        principal: &Principal,
        id: &Uuid,
    ) -> Result<UserSummary, AppError> {
        if !access::can_view_user(principal, id) {
            return Err(AppError::forbidden("Missing required role"));
        }

        let user = self
            .user_dao
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(UserSummary::from(&user))
    }

    /// Admin-only (enforced at the route). The self-protection check runs
    /// before any store mutation.
    pub async fn update_role(
        &self,
        principal: &Principal,
        target: &Uuid,
        role: Role,
    ) -> Result<UserSummary, AppError> {
        access::ensure_not_self(principal, target)?;

        let user = self
            .user_dao
            .find_active_by_id(target)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let updated = self
            .user_dao
            .update(user.id, move |active| {
                active.role = Set(role.as_str().to_string());
            })
            .await?;
        Ok(UserSummary::from(&updated))
    }

    /// Activate or deactivate an account. Deactivation is the soft delete;
    /// reactivation must find soft-deleted rows, so this looks up without
    /// the active filter.
    pub async fn set_active(
        &self,
        principal: &Principal,
        target: &Uuid,
        is_active: bool,
    ) -> Result<UserSummary, AppError> {
        access::ensure_not_self(principal, target)?;

        let updated = match self
            .user_dao
            .update(*target, move |active| {
                active.is_active = Set(is_active);
            })
            .await
        {
            Ok(model) => model,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::not_found("User not found"));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(UserSummary::from(&updated))
    }
}
