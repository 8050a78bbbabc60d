/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: JWT access and refresh tokens
/// - [`middleware`]: resolves a bearer token to an authenticated caller
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations, per-user salt
/// - **JWT Tokens**: HS256 signing, short-lived access tokens, 30-day refresh tokens
/// - **Token Subjects**: re-loaded on every request, so deleted users lose access
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::auth::password::{hash_password, verify_password};
/// use taskdesk_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let digest = hash_password("Secur3Passw0rd")?;
/// assert!(verify_password("Secur3Passw0rd", &digest.hash)?);
///
/// let claims = Claims::new(1, "alice", TokenType::Access);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// let decoded = validate_access_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(decoded.sub, 1);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
