//! Customer authentication service.
//!
//! Provides registration and password login. Passwords are hashed with
//! Argon2id; the hash never leaves the repository layer except for
//! verification here.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use websale_core::Email;
use websale_core::events::DomainEvent;

use super::events::EventBus;
use super::validation::Validator;
use crate::db::RepositoryError;
use crate::db::customers::{CustomerRepository, NewCustomer};
use crate::models::customer::{Customer, LoginInput, RegisterInput};
use crate::state::AppState;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
pub struct AuthService<'a> {
    customers: CustomerRepository<'a>,
    events: &'a EventBus,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self {
            customers: CustomerRepository::new(state.pool()),
            events: state.events(),
        }
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::Validation` if a name or the phone is invalid.
    /// Returns `AuthError::CustomerAlreadyExists` if the email is registered.
    pub async fn register(&self, input: &RegisterInput) -> Result<Customer, AuthError> {
        let email = Email::parse(&input.email)?;
        validate_password(&input.password)?;
        validate_profile(input)?;

        let password_hash = hash_password(&input.password)?;
        let address = input
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let customer = self
            .customers
            .create(&NewCustomer {
                email: &email,
                first_name: input.first_name.trim(),
                last_name: input.last_name.trim(),
                phone: input.phone.trim(),
                address,
                password_hash: &password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::CustomerAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(customer_id = %customer.id, email = %customer.email, "Customer registered");
        self.events.publish(DomainEvent::CustomerRegistered {
            customer_id: customer.id,
            email: customer.email.to_string(),
        });
        Ok(customer)
    }

    /// Login with email and password, stamping `last_login_at`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountDisabled` if the account is not active.
    pub async fn login(&self, input: &LoginInput) -> Result<Customer, AuthError> {
        let email = Email::parse(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let (mut customer, password_hash) = self
            .customers
            .get_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&input.password, &password_hash)?;

        if !customer.status.can_login() {
            tracing::warn!(customer_id = %customer.id, status = %customer.status, "Login refused");
            return Err(AuthError::AccountDisabled(customer.status));
        }

        customer.last_login_at = Some(self.customers.record_login(customer.id).await?);
        tracing::info!(customer_id = %customer.id, "Customer logged in");
        Ok(customer)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_profile(input: &RegisterInput) -> Result<(), AuthError> {
    let mut v = Validator::new();
    v.length("firstName", &input.first_name, 1, 50)
        .length("lastName", &input.last_name, 1, 50)
        .phone(input.phone.trim());
    if let Some(address) = &input.address {
        v.length("address", address, 0, 500);
    }
    v.finish().map_err(|e| AuthError::Validation(e.to_string()))
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
