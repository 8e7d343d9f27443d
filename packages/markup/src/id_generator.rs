use crc32fast::Hasher;

/// Derive a stable fragment id from an arbitrary document key using CRC32
pub fn get_fragment_id(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for nodes within one fragment
#[derive(Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(key: &str) -> Self {
        Self {
            seed: get_fragment_id(key),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
