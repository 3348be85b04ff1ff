use anyhow::Result;
use dyass::app::CleanseService;
use dyass::lexicon::Lexicon;
use dyass::pipeline::{Normalizer, TextNormalizer};
use dyass::storage::{Collection, RecordStore, SqliteDatabase};
use dyass::CleanseError;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn write_lexicon(dir: &Path) -> Result<Lexicon> {
    let informal = dir.join("new_kamusalay.csv");
    let disallowed = dir.join("abusive.csv");
    fs::write(&informal, "gw,saya\nbgt,banget\nga,tidak\n")?;
    fs::write(&disallowed, "ABUSIVE\nbego\nkampret\n")?;
    Ok(Lexicon::load(&informal, &disallowed)?)
}

fn service(db: &SqliteDatabase, lexicon: Lexicon) -> CleanseService {
    CleanseService::new(
        Arc::new(TextNormalizer::new(Arc::new(lexicon))),
        Arc::new(db.store(Collection::Text)),
        Arc::new(db.store(Collection::File)),
    )
}

#[tokio::test]
async fn test_records_survive_reopen() -> Result<()> {
    let temp_dir = tempdir()?;
    let lexicon = write_lexicon(temp_dir.path())?;
    let db_path = temp_dir.path().join("data").join("output.db");

    {
        let db = SqliteDatabase::open(&db_path)?;
        let service = service(&db, lexicon.clone());
        let record = service
            .clean_text("Gw GA ngerti bgt sama si kampret itu https://t.co/abc #kesel")
            .await?;
        assert_eq!(record.clean_text, "saya tidak ngerti banget sama si itu");

        service.clean_file(b"Tweet\nbego bgt\n\"halo,\n@user dunia\"\n").await?;
    }

    let db = SqliteDatabase::open(&db_path)?;
    let texts = db.store(Collection::Text);
    let files = db.store(Collection::File);

    let stored = texts.list_all().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, 1);

    let rows = files.list_all().await?;
    let cleaned: Vec<_> = rows.iter().map(|r| r.clean_text.as_str()).collect();
    assert_eq!(cleaned, vec!["banget", "halo dunia"]);
    // The stored dirty text keeps the original cell verbatim
    assert_eq!(rows[1].dirty_text, "halo,\n@user dunia");
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_scoped_to_collection() -> Result<()> {
    let temp_dir = tempdir()?;
    let lexicon = write_lexicon(temp_dir.path())?;
    let db = SqliteDatabase::open(temp_dir.path().join("output.db"))?;
    let service = service(&db, lexicon);

    let text = service.clean_text("pertama").await?;
    service.clean_file(b"Tweet\nbaris\n").await?;

    // Same id exists in both collections; deleting one leaves the other
    service.delete(Collection::File, text.id).await?;
    assert_eq!(service.get(Collection::Text, text.id).await?.clean_text, "pertama");

    let err = service.update(Collection::File, text.id, "baru").await.unwrap_err();
    assert!(matches!(err, CleanseError::NotFound { collection: Collection::File, .. }));
    assert!(service.list(Collection::File).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_stored_clean_text_matches_pipeline() -> Result<()> {
    let temp_dir = tempdir()?;
    let lexicon = write_lexicon(temp_dir.path())?;
    let normalizer = TextNormalizer::new(Arc::new(lexicon.clone()));
    let db = SqliteDatabase::open_in_memory()?;
    let service = service(&db, lexicon);

    for input in ["Gw BEGO bgt!!", "", "xyz user @a #b"] {
        let record = service.clean_text(input).await?;
        assert_eq!(record.clean_text, normalizer.normalize(&record.dirty_text));
        assert_eq!(service.get(Collection::Text, record.id).await?, record);
    }
    Ok(())
}
