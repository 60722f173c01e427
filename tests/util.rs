use sea_spool::{
    export::time::OffsetDateTime, FilenameGenerator, FixedEnv, Sink, SpoolBackend, Template,
};
use std::{
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

pub fn temp_dir(name: &str) -> Result<PathBuf, std::io::Error> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before 1970")
        .as_millis();
    let path = std::env::temp_dir().join(format!("sea-spool-root-{name}-{millis}"));
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn names(template: &str) -> FilenameGenerator {
    let env = FixedEnv {
        now: OffsetDateTime::UNIX_EPOCH,
        uuid: "00000000-0000-0000-0000-000000000000".to_owned(),
        host: "localhost".to_owned(),
    };
    FilenameGenerator::new(Template::compile(template).unwrap(), Arc::new(env))
}

pub fn new_sink(backend: SpoolBackend, template: &str, threshold: u64) -> Sink<SpoolBackend> {
    Sink::new(backend, names(template), threshold)
}
