use crate::domain::user::User;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

/// One user per line, headerless: `id,username,password,email,role`.
#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    id: u32,
    username: String,
    password: String,
    email: String,
    role: String,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            password: user.password.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

impl UserRecord {
    fn into_user(self) -> Result<User> {
        Ok(User {
            id: self.id,
            username: self.username,
            password: self.password,
            email: self.email,
            role: self.role.parse()?,
        })
    }
}

pub fn load<R: Read>(source: R) -> Result<Vec<User>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(source);
    let mut users = Vec::new();
    for record in reader.deserialize::<UserRecord>() {
        users.push(record?.into_user()?);
    }
    Ok(users)
}

pub fn save<W: Write>(out: W, users: &[User]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    for user in users {
        writer.serialize(UserRecord::from(user))?;
    }
    writer.flush()?;
    Ok(())
}

/// The durable user record store, rewritten in full on every user mutation.
pub struct UserArchive {
    path: PathBuf,
}

impl UserArchive {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Vec<User>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        load(File::open(&self.path)?)
    }

    pub fn save(&self, users: &[User]) -> Result<()> {
        save(File::create(&self.path)?, users)
    }
}
