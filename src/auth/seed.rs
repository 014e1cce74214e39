use sqlx::PgPool;
use tracing::info;

use crate::auth::repo_types::{Role, User};
use crate::auth::services::hash_password;

/// Ensures the configured admin account exists and carries the admin role.
/// Reads `ADMIN_EMAIL` / `ADMIN_PASSWORD`; a no-op when either is unset.
/// Safe to run on every startup.
pub async fn ensure_admin(db: &PgPool) -> anyhow::Result<()> {
    let (email, password) = match (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        (Ok(e), Ok(p)) if !e.is_empty() && !p.is_empty() => (e.trim().to_lowercase(), p),
        _ => return Ok(()),
    };

    match User::find_by_email(db, &email).await? {
        Some(user) => {
            if user.role() != Role::Admin {
                User::set_role(db, user.id, Role::Admin.as_str()).await?;
                info!(user_id = %user.id, "promoted existing user to admin");
            }
        }
        None => {
            let hash = hash_password(&password)?;
            let user = User::create(db, &email, &hash, Role::Admin.as_str()).await?;
            info!(user_id = %user.id, "seeded admin account");
        }
    }

    Ok(())
}
