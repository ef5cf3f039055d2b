//! Prints an Argon2 hash suitable for `ADMIN_PASSWORD_HASH`.
//!
//! Usage: `hash-password <password>`

use color_eyre::eyre::{Result, bail};
use slotbook_api::middleware::auth::hash_password;

fn main() -> Result<()> {
    color_eyre::install()?;

    let mut args = std::env::args().skip(1);
    let (Some(password), None) = (args.next(), args.next()) else {
        bail!("usage: hash-password <password>");
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }

    println!("{}", hash_password(&password)?);
    Ok(())
}
