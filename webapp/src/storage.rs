use anyhow::Result;
use gloo_console::error as console_error;
use web_sys::Storage;

use common::storage::PreferenceStore;

// window.localStorage, read and written as raw strings
//
// storage can be missing altogether (privacy modes, sandboxed iframes), in which case reads
// come back empty and writes fail without taking anything else down
pub struct LocalPreferences;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl PreferenceStore for LocalPreferences {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).unwrap_or_else(|err| {
            console_error!(format!("Failed to fetch local storage {key}: {err:?}"));
            None
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let storage =
            local_storage().ok_or_else(|| anyhow::Error::msg("local storage unavailable"))?;

        storage.set_item(key, value).map_err(|err| {
            console_error!(format!("Failed to set local storage {key}: {err:?}"));
            anyhow::Error::msg("Local storage failure, see console log")
        })
    }
}
