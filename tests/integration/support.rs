use figment::Jail;
use std::path::Path;

/// Run `f` with an empty environment and an empty settings file.
///
/// `f` receives the settings file path to pass as `--config`, so neither
/// the user's own config file nor `FDUP_*` variables reach the run.
pub fn isolated<T>(f: impl FnOnce(&Path) -> T) -> T {
    let mut out = None;
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.create_file("empty.toml", "")?;
        let config = jail.directory().join("empty.toml");
        out = Some(f(&config));
        Ok(())
    });
    out.expect("jail closure did not run")
}
