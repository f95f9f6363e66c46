use sea_orm::DatabaseConnection;

use crate::{
    auth::providers::AuthProviders,
    db::dao::{DaoContext, RefreshTokenDao, UserDao},
    services::{
        auth_service::AuthService, category_service::CategoryService, task_service::TaskService,
        user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.daos.db()
    }

    pub fn user_dao(&self) -> UserDao {
        self.daos.user()
    }

    pub fn refresh_token_dao(&self) -> RefreshTokenDao {
        self.daos.refresh_token()
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn task(&self) -> TaskService {
        TaskService::new(self.daos.task(), self.daos.user(), self.daos.category())
    }

    pub fn category(&self) -> CategoryService {
        CategoryService::new(self.daos.category(), self.daos.task())
    }

    pub fn auth<'a>(&self, providers: &'a AuthProviders) -> AuthService<'a> {
        AuthService::new(providers)
    }
}
