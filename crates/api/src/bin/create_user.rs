//! Account provisioning CLI.
//!
//! There is no self-service signup; accounts are created from the command
//! line by an operator:
//!
//! ```text
//! create-user <username> <password>
//! ```
//!
//! Creating a user that already exists resets their password instead.

use rota_api::auth::password::{hash_password, PasswordPolicy};
use rota_db::repositories::UserRepo;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(username), Some(password)) = (args.next(), args.next()) else {
        eprintln!("usage: create-user <username> <password>");
        std::process::exit(2);
    };

    if let Err(msg) = PasswordPolicy::from_env().check(&password) {
        eprintln!("error: {msg}");
        std::process::exit(2);
    }

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = rota_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    rota_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let password_hash = hash_password(&password).expect("Password hashing failed");

    match UserRepo::find_by_username(&pool, &username)
        .await
        .expect("User lookup failed")
    {
        Some(existing) => {
            UserRepo::set_password_hash(&pool, existing.id, &password_hash)
                .await
                .expect("Password update failed");
            println!("Updated password for '{username}' (id {})", existing.id);
        }
        None => {
            let user = UserRepo::create(&pool, &username, &password_hash)
                .await
                .expect("User creation failed");
            println!("Created user '{username}' (id {})", user.id);
        }
    }
}
