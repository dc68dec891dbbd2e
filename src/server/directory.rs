//! In-memory user directory for the reference backend

use std::collections::HashMap;

use crate::auth::models::{Role, UserRecord};
use crate::config::SeedUser;
use crate::error::{Error, Result};

/// Account stored by the backend
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub subjects: Vec<String>,
    pub bio: String,
    pub password_hash: String,
}

impl StoredUser {
    /// Check a password against the stored hash. CPU-bound; run it off the async workers.
    pub fn verify_password(&self, password: &str) -> Result<bool> {
        Ok(bcrypt::verify(password, &self.password_hash)?)
    }

    /// Wire representation, without the password hash
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id.clone(),
            full_name: Some(self.full_name.clone()),
            email: Some(self.email.clone()),
            role: Some(self.role.to_string()),
            subjects: Some(self.subjects.clone()),
            bio: Some(self.bio.clone()),
        }
    }
}

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub subjects: Vec<String>,
    pub bio: String,
}

impl From<&SeedUser> for NewUser {
    fn from(seed: &SeedUser) -> Self {
        Self {
            full_name: seed.name.clone(),
            email: seed.email.clone(),
            password: seed.password.clone(),
            role: seed.role,
            subjects: seed.subjects.clone(),
            bio: seed.bio.clone(),
        }
    }
}

/// Accounts keyed by normalized email
pub struct UserDirectory {
    users: HashMap<String, StoredUser>,
    bcrypt_cost: u32,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl UserDirectory {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            users: HashMap::new(),
            bcrypt_cost,
        }
    }

    /// Build a directory holding the configured seed accounts
    pub fn from_seed(seed_users: &[SeedUser], bcrypt_cost: u32) -> Result<Self> {
        let mut directory = Self::new(bcrypt_cost);
        for seed in seed_users {
            let user = directory.insert(NewUser::from(seed))?;
            tracing::debug!("Seeded user {} ({})", user.email, user.role);
        }
        Ok(directory)
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Validate a new account against the directory without changing it
    pub fn check_new(&self, new_user: &NewUser) -> Result<()> {
        let email = normalize_email(&new_user.email);
        if email.is_empty() || !email.contains('@') {
            return Err(Error::InvalidInput("a valid email is required".to_string()));
        }
        if new_user.password.is_empty() {
            return Err(Error::InvalidInput("password must not be empty".to_string()));
        }
        if self.users.contains_key(&email) {
            return Err(Error::EmailTaken(email));
        }
        Ok(())
    }

    /// Add an account, hashing its password inline
    pub fn insert(&mut self, new_user: NewUser) -> Result<StoredUser> {
        self.check_new(&new_user)?;
        let password_hash = hash_password(&new_user.password, self.bcrypt_cost)?;
        self.insert_hashed(new_user, password_hash)
    }

    /// Add an account whose password was already hashed with [`hash_password`]
    pub fn insert_hashed(&mut self, new_user: NewUser, password_hash: String) -> Result<StoredUser> {
        self.check_new(&new_user)?;

        let email = normalize_email(&new_user.email);
        let user = StoredUser {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: new_user.full_name.trim().to_string(),
            email: email.clone(),
            role: new_user.role,
            subjects: new_user.subjects,
            bio: new_user.bio,
            password_hash,
        };
        self.users.insert(email, user.clone());
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&StoredUser> {
        self.users.get(&normalize_email(email))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&StoredUser> {
        self.users.values().find(|user| user.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}
