#![no_main]

use libfuzzer_sys::fuzz_target;
use manifold_di::{ConnectionParams, EnvOverrides};

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let text = |bytes: &[u8]| -> Option<String> {
        let s: String = bytes
            .iter()
            .filter(|b| b.is_ascii_alphanumeric())
            .map(|b| *b as char)
            .collect();
        (!s.is_empty()).then_some(s)
    };

    let split = data.len() / 3;
    let inherited_name = text(&data[..split]);
    let override_name = text(&data[split..2 * split]);
    let suffix = text(&data[2 * split..]).unwrap_or_default();

    let mut base = ConnectionParams::default();
    if let Some(name) = &inherited_name {
        base = base.with_dbname(name.clone());
    }
    let mut env = EnvOverrides::none();
    if let Some(name) = &override_name {
        env = env.with_dbname(name.clone());
    }

    let resolved = base.with_overrides(&env, &suffix);

    // Invariants of the database-name rule.
    match (override_name, inherited_name) {
        (Some(explicit), _) => assert_eq!(resolved.dbname.as_deref(), Some(explicit.as_str())),
        (None, Some(inherited)) => {
            assert_eq!(resolved.dbname.as_deref(), Some(format!("{}{}", inherited, suffix).as_str()))
        }
        (None, None) => assert!(resolved.dbname.is_none()),
    }
    // Driver and charset always resolve to something.
    assert!(!resolved.driver.is_empty());
    assert!(!resolved.charset.is_empty());
});
