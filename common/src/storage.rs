use anyhow::Result;

// browser-local key/value storage
//
// values are stored raw (no json encoding) so that the page and any other script can read
// the same keys
pub trait PreferenceStore: 'static {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}
