use sled::Db;

/// String key/value store on top of sled
pub struct SledDb {
    db: Db,
}

impl SledDb {
    pub fn new(path: &str) -> Result<Self, sled::Error> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    /// Throwaway database, removed when dropped
    pub fn temporary() -> Result<Self, sled::Error> {
        Ok(Self {
            db: sled::Config::new().temporary(true).open()?,
        })
    }

    pub fn insert_str(&self, key: &str, value: &str) -> Result<(), sled::Error> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.flush()?;
        Ok(())
    }

    pub fn get_str(&self, key: &str) -> Result<Option<String>, sled::Error> {
        Ok(self
            .db
            .get(key.as_bytes())?
            .map(|value| String::from_utf8_lossy(value.as_ref()).into_owned()))
    }

    fn flush(&self) -> sled::Result<usize> {
        self.db.flush()
    }
}
