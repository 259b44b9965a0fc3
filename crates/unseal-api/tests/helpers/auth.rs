//! Token minting for tests.
//!
//! Tokens are signed with the same shared secret `Config::for_tests` puts
//! into the app, standing in for the external identity provider.

use unseal_api::auth::jwt::JwtService;
use unseal_api::auth::models::UserRole;
use uuid::Uuid;

/// Must match `Config::for_tests`.
pub const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret!";

pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

fn mint(role: UserRole) -> TestUser {
    let user_id = Uuid::new_v4();
    let token = JwtService::new(TEST_JWT_SECRET)
        .mint_token(user_id, role, 3600)
        .expect("mint test token");
    TestUser { user_id, token }
}

/// A fresh regular user with a valid bearer token.
pub fn test_user() -> TestUser {
    mint(UserRole::User)
}

/// A fresh operator with a valid bearer token.
pub fn test_operator() -> TestUser {
    mint(UserRole::Operator)
}
