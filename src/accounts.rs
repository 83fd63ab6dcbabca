//! Account Service
//!
//! Signup and login backed by the local SQLite database. Passwords are
//! stored as bcrypt hashes.

use rusqlite::{params, ErrorCode, OptionalExtension};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::db;
use crate::error::{LarderError, LarderResult};

const INVALID_LOGIN: &str = "Invalid email or password.";
const EMAIL_TAKEN: &str = "Email already exists.";

/// bcrypt work factor
const HASH_COST: u32 = 10;

/// Signup form. Numeric fields arrive as numbers or strings from the app.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// User profile as returned to clients (never includes the password)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub age: i64,
    pub gender: String,
    pub height: i64,
    pub weight: i64,
    pub email: String,
}

pub struct AccountService {
    db_path: PathBuf,
}

impl AccountService {
    pub fn new(db_path: PathBuf) -> LarderResult<Self> {
        let service = Self { db_path };
        service.init_db()?;
        Ok(service)
    }

    fn init_db(&self) -> LarderResult<()> {
        let conn = db::open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                firstname TEXT NOT NULL,
                lastname TEXT NOT NULL,
                age INTEGER NOT NULL,
                gender TEXT NOT NULL,
                height INTEGER NOT NULL,
                weight INTEGER NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn signup(&self, req: &SignupRequest) -> LarderResult<User> {
        let fields = [
            &req.firstname,
            &req.lastname,
            &req.age,
            &req.gender,
            &req.height,
            &req.weight,
            &req.email,
            &req.password,
        ];
        if fields
            .iter()
            .any(|f| f.as_deref().map(str::trim).unwrap_or("").is_empty())
        {
            return Err(LarderError::Validation("Please fill in all fields.".to_string()));
        }

        let height = parse_in_range(&req.height, 50, 250)
            .ok_or_else(|| LarderError::Validation("Height must be between 50 and 250 cm.".into()))?;
        let weight = parse_in_range(&req.weight, 30, 200)
            .ok_or_else(|| LarderError::Validation("Weight must be between 30 and 200 kg.".into()))?;
        let age = parse_in_range(&req.age, 1, 120)
            .ok_or_else(|| LarderError::Validation("Please enter a valid age (1-120).".into()))?;

        let text = |f: &Option<String>| f.as_deref().unwrap_or("").trim().to_string();
        let email = text(&req.email).to_lowercase();
        let password = req.password.as_deref().unwrap_or("");

        let password_hash = hash_password(password)?;

        let user = User {
            id: 0,
            firstname: text(&req.firstname),
            lastname: text(&req.lastname),
            age,
            gender: text(&req.gender),
            height,
            weight,
            email,
        };
        // The UNIQUE email column decides duplicates, so concurrent signups cannot race
        let conn = db::open(&self.db_path)?;
        let inserted = conn.execute(
            "INSERT INTO users (firstname, lastname, age, gender, height, weight, email, password, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.firstname,
                user.lastname,
                user.age,
                user.gender,
                user.height,
                user.weight,
                user.email,
                password_hash,
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(LarderError::Conflict(EMAIL_TAKEN.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let user = User {
            id: conn.last_insert_rowid(),
            ..user
        };
        info!("👤 Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> LarderResult<User> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(LarderError::Validation(
                "Please enter email and password.".to_string(),
            ));
        }

        let conn = db::open(&self.db_path)?;
        let row = conn
            .query_row(
                "SELECT id, firstname, lastname, age, gender, height, weight, email, password
                 FROM users WHERE email = ?1",
                [&email],
                |row| {
                    Ok((
                        User {
                            id: row.get(0)?,
                            firstname: row.get(1)?,
                            lastname: row.get(2)?,
                            age: row.get(3)?,
                            gender: row.get(4)?,
                            height: row.get(5)?,
                            weight: row.get(6)?,
                            email: row.get(7)?,
                        },
                        row.get::<_, String>(8)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((user, stored)) if verify_password(password, &stored) => Ok(user),
            _ => Err(LarderError::Unauthorized(INVALID_LOGIN.to_string())),
        }
    }
}

/// Integer parse that tolerates "170", " 170 " and 170.5, like the app's form input
fn parse_in_range(value: &Option<String>, min: i64, max: i64) -> Option<i64> {
    let raw = value.as_deref()?.trim();
    let parsed = raw
        .parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?;
    (min..=max).contains(&parsed).then_some(parsed)
}

fn hash_password(password: &str) -> LarderResult<String> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// Malformed stored hashes never verify
fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Accept a JSON string or number, mapping null to `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(
        Option::<Lenient>::deserialize(deserializer)?.map(|value| match value {
            Lenient::Text(s) => s,
            Lenient::Int(n) => n.to_string(),
            Lenient::Float(f) => f.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> (tempfile::TempDir, AccountService) {
        let dir = tempfile::tempdir().unwrap();
        let service = AccountService::new(dir.path().join("larder.db")).unwrap();
        (dir, service)
    }

    fn request() -> SignupRequest {
        serde_json::from_value(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "age": "36",
            "gender": "female",
            "height": 165,
            "weight": "58",
            "email": "Ada@Example.com",
            "password": "analytical"
        }))
        .unwrap()
    }

    #[test]
    fn test_signup_then_login() {
        let (_dir, service) = service();
        let user = service.signup(&request()).unwrap();
        assert!(user.id > 0);
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.height, 165);

        let logged_in = service.login("ada@example.com", "analytical").unwrap();
        assert_eq!(logged_in, user);
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let (_dir, service) = service();
        service.signup(&request()).unwrap();
        let err = service.signup(&request()).unwrap_err();
        assert!(matches!(err, LarderError::Conflict(_)));
    }

    #[test]
    fn test_concurrent_signups_conflict_not_fail() {
        let (_dir, service) = service();
        let results: Vec<LarderResult<User>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| service.signup(&request())))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, LarderError::Conflict(_)), "got {err:?}");
        }
    }

    #[test]
    fn test_missing_field_rejected() {
        let (_dir, service) = service();
        let mut req = request();
        req.gender = Some("  ".to_string());
        let err = service.signup(&req).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all fields.");
    }

    #[test]
    fn test_ranges_checked() {
        let (_dir, service) = service();

        let mut req = request();
        req.height = Some("300".to_string());
        assert_eq!(
            service.signup(&req).unwrap_err().to_string(),
            "Height must be between 50 and 250 cm."
        );

        let mut req = request();
        req.weight = Some("heavy".to_string());
        assert_eq!(
            service.signup(&req).unwrap_err().to_string(),
            "Weight must be between 30 and 200 kg."
        );

        let mut req = request();
        req.age = Some("0".to_string());
        assert_eq!(
            service.signup(&req).unwrap_err().to_string(),
            "Please enter a valid age (1-120)."
        );
    }

    #[test]
    fn test_bad_credentials_unauthorized() {
        let (_dir, service) = service();
        service.signup(&request()).unwrap();

        let wrong_password = service.login("ada@example.com", "babbage").unwrap_err();
        let unknown_email = service.login("nobody@example.com", "x").unwrap_err();
        assert!(matches!(wrong_password, LarderError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn test_password_hash_is_salted() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$2"));
        assert!(verify_password("secret", &a));
        assert!(!verify_password("Secret", &a));
        assert!(!verify_password("secret", "garbage"));
    }
}
