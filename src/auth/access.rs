//! Role and ownership rules for task records. Pure functions over a
//! principal and a resource; callers translate denials into responses.

use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::{
    db::entities::{task, task_comment, user},
    error::AppError,
};

use super::Principal;

/// Composable filter restricting task queries to what the principal may see.
/// `None` means unrestricted (managers and admins); users see only tasks
/// they created or were assigned.
pub fn task_scope(principal: &Principal) -> Option<Condition> {
    if principal.role.is_elevated() {
        return None;
    }
    Some(
        Condition::any()
            .add(task::Column::CreatedBy.eq(principal.user_id))
            .add(task::Column::AssignedTo.eq(principal.user_id)),
    )
}

/// Update and complete: creator or assignee for plain users. Callers must
/// surface a denial exactly like a missing task.
pub fn can_modify_task(principal: &Principal, task: &task::Model) -> bool {
    if principal.role.is_elevated() {
        return true;
    }
    task.created_by == principal.user_id || task.assigned_to == Some(principal.user_id)
}

/// Delete is stricter than update: an assignee may not delete.
pub fn can_delete_task(principal: &Principal, task: &task::Model) -> bool {
    if principal.role.is_elevated() {
        return true;
    }
    task.created_by == principal.user_id
}

pub fn can_delete_comment(principal: &Principal, comment: &task_comment::Model) -> bool {
    principal.role.is_elevated() || comment.user_id == principal.user_id
}

/// Plain users can only list themselves; managers and admins list everyone.
pub fn user_list_scope(principal: &Principal) -> Option<Condition> {
    if principal.role.is_elevated() {
        return None;
    }
    Some(Condition::all().add(user::Column::Id.eq(principal.user_id)))
}

pub fn can_view_user(principal: &Principal, target: &Uuid) -> bool {
    principal.role.is_elevated() || principal.user_id == *target
}

/// Self-protection invariant: an admin must not change their own role or
/// deactivate their own account. Checked before any mutation.
pub fn ensure_not_self(principal: &Principal, target: &Uuid) -> Result<(), AppError> {
    if principal.user_id == *target {
        return Err(AppError::forbidden("Cannot modify your own account"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    use crate::auth::{Principal, Role};
    use crate::db::entities::{task, task_comment};

    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
            jti: Uuid::new_v4(),
        }
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn task_model(created_by: Uuid, assigned_to: Option<Uuid>) -> task::Model {
        let now = ts();
        task::Model {
            id: Uuid::new_v4(),
            title: "Ship the report".to_string(),
            description: String::new(),
            priority: 2,
            status: 1,
            due_date: None,
            completed_at: None,
            created_by,
            assigned_to,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn comment_model(user_id: Uuid) -> task_comment::Model {
        let now = ts();
        task_comment::Model {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            user_id,
            content: "looks good".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn elevated_roles_are_unscoped() {
        assert!(task_scope(&principal(Role::Manager)).is_none());
        assert!(task_scope(&principal(Role::Admin)).is_none());
        assert!(task_scope(&principal(Role::User)).is_some());

        assert!(user_list_scope(&principal(Role::Manager)).is_none());
        assert!(user_list_scope(&principal(Role::User)).is_some());
    }

    #[test]
    fn user_may_modify_own_and_assigned_tasks_only() {
        let p = principal(Role::User);

        assert!(can_modify_task(&p, &task_model(p.user_id, None)));
        assert!(can_modify_task(&p, &task_model(Uuid::new_v4(), Some(p.user_id))));
        assert!(!can_modify_task(&p, &task_model(Uuid::new_v4(), None)));
        assert!(!can_modify_task(
            &p,
            &task_model(Uuid::new_v4(), Some(Uuid::new_v4()))
        ));
    }

    #[test]
    fn manager_may_modify_any_task() {
        let p = principal(Role::Manager);
        assert!(can_modify_task(&p, &task_model(Uuid::new_v4(), None)));
        assert!(can_delete_task(&p, &task_model(Uuid::new_v4(), None)));
    }

    #[test]
    fn assignee_may_not_delete() {
        let p = principal(Role::User);

        assert!(can_delete_task(&p, &task_model(p.user_id, None)));
        assert!(!can_delete_task(
            &p,
            &task_model(Uuid::new_v4(), Some(p.user_id))
        ));
    }

    #[test]
    fn comment_deletion_is_author_or_elevated() {
        let p = principal(Role::User);

        assert!(can_delete_comment(&p, &comment_model(p.user_id)));
        assert!(!can_delete_comment(&p, &comment_model(Uuid::new_v4())));
        assert!(can_delete_comment(
            &principal(Role::Admin),
            &comment_model(Uuid::new_v4())
        ));
    }

    #[test]
    fn user_views_only_self() {
        let p = principal(Role::User);
        assert!(can_view_user(&p, &p.user_id));
        assert!(!can_view_user(&p, &Uuid::new_v4()));
        assert!(can_view_user(&principal(Role::Admin), &Uuid::new_v4()));
    }

    #[test]
    fn self_modification_is_denied_before_any_mutation() {
        let p = principal(Role::Admin);

        let err = ensure_not_self(&p, &p.user_id).expect_err("self target should be denied");
        assert_eq!(err.message(), "Cannot modify your own account");

        assert!(ensure_not_self(&p, &Uuid::new_v4()).is_ok());
    }
}
