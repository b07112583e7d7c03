use anyhow::Result;
use tempfile::TempDir;
use test_utils::API_KEY;

use super::CredentialStore;
use crate::domain::models::Persona;
use crate::domain::models::SessionConfiguration;

fn store(dir: &TempDir) -> CredentialStore {
    return CredentialStore::new(dir.path().join("nested/gemini_agent_config.json"));
}

fn config(persona: Persona) -> SessionConfiguration {
    return SessionConfiguration {
        api_key: API_KEY.to_string(),
        selected_persona: persona,
    };
}

#[tokio::test]
async fn it_loads_nothing_when_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert_eq!(store(&dir).load().await, None);
    return Ok(());
}

#[tokio::test]
async fn it_round_trips_saved_configuration() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    store.save(&config(Persona::Programmer)).await?;
    assert_eq!(store.load().await, Some(config(Persona::Programmer)));

    return Ok(());
}

#[tokio::test]
async fn it_overwrites_previous_configuration() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    store.save(&config(Persona::Programmer)).await?;
    store.save(&config(Persona::Creator)).await?;
    assert_eq!(store.load().await, Some(config(Persona::Creator)));
    assert!(!store.path().with_extension("json.tmp").exists());

    return Ok(());
}

#[tokio::test]
async fn it_writes_the_expected_record() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);
    store.save(&config(Persona::Business)).await?;

    let payload = std::fs::read_to_string(store.path())?;
    let value: serde_json::Value = serde_json::from_str(&payload)?;
    assert_eq!(value["apiKey"], API_KEY);
    assert_eq!(value["selectedPersona"], "BUSINESS");

    return Ok(());
}

#[tokio::test]
async fn it_treats_corrupt_records_as_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("gemini_agent_config.json");
    std::fs::write(&path, "{ not json")?;

    assert_eq!(CredentialStore::new(path).load().await, None);
    return Ok(());
}

#[tokio::test]
async fn it_treats_unknown_personas_as_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("gemini_agent_config.json");
    std::fs::write(
        &path,
        format!("{{\"apiKey\": \"{API_KEY}\", \"selectedPersona\": \"PIRATE\"}}"),
    )?;

    assert_eq!(CredentialStore::new(path).load().await, None);
    return Ok(());
}

#[tokio::test]
async fn it_clears_configuration() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    store.save(&config(Persona::Assistant)).await?;
    store.clear().await?;
    assert_eq!(store.load().await, None);
    assert!(!store.path().exists());

    // Clearing twice is fine.
    store.clear().await?;

    return Ok(());
}
