//! Fuzz target: stored theme decoding
//!
//! Plants arbitrary bytes under the theme key and checks `load_theme`
//! never panics and only ever returns a theme or `Corrupted`.
//!
//! cargo fuzz run fuzz_theme_prefs

#![no_main]

use libfuzzer_sys::fuzz_target;
use soil_dashboard::adapters::prefs::PrefsStore;
use soil_dashboard::app::ports::{
    PREFS_NAMESPACE, StorageError, StoragePort, THEME_KEY, load_theme, save_theme,
};

fuzz_target!(|data: &[u8]| {
    let mut store = PrefsStore::in_memory();
    if store.write(PREFS_NAMESPACE, THEME_KEY, data).is_err() {
        return;
    }
    match load_theme(&store) {
        Ok(Some(theme)) => {
            // Whatever decoded must survive a save/load cycle.
            save_theme(&mut store, theme).unwrap();
            assert_eq!(load_theme(&store), Ok(Some(theme)));
        }
        Ok(None) => unreachable!("key was just written"),
        Err(e) => assert!(matches!(
            e,
            StorageError::Corrupted | StorageError::BufferTooSmall
        )),
    }
});
