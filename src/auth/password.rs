use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
#[cfg(test)]
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

#[cfg(test)]
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Fails both on a mismatch and on a malformed stored hash.
pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hashed)?;

    Argon2::default().verify_password(password.as_bytes(), &parsed)
}
