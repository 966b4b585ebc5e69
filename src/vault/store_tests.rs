use super::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_write_creates_folders_and_read_back() {
    let temp = TempDir::new().unwrap();
    let vault = Vault::new(temp.path());
    let path = Path::new("GitHub/acme-widget.md");

    vault.write(path, "hello").await.unwrap();

    assert!(vault.exists(path).await);
    assert_eq!(vault.read(path).await.unwrap(), "hello");
}

#[tokio::test]
async fn test_read_missing_is_not_found() {
    let temp = TempDir::new().unwrap();
    let vault = Vault::new(temp.path());

    let err = vault.read(Path::new("missing.md")).await.unwrap_err();
    assert!(matches!(err, VaultError::NotFound(_)));
}

#[tokio::test]
async fn test_create_refuses_existing() {
    let temp = TempDir::new().unwrap();
    let vault = Vault::new(temp.path());
    let path = Path::new("note.md");
    vault.create(path, "first").await.unwrap();

    let err = vault.create(path, "second").await.unwrap_err();

    assert!(matches!(err, VaultError::AlreadyExists(_)));
    assert_eq!(vault.read(path).await.unwrap(), "first");
}

#[tokio::test]
async fn test_replace_overwrites_existing_note() {
    let temp = TempDir::new().unwrap();
    let vault = Vault::new(temp.path());
    let path = Path::new("GitHub/acme-widget.md");
    vault.write(path, "old").await.unwrap();

    vault.replace(path, "new").await.unwrap();

    assert_eq!(vault.read(path).await.unwrap(), "new");
}

#[tokio::test]
async fn test_replace_never_creates_note_or_folder() {
    let temp = TempDir::new().unwrap();
    let vault = Vault::new(temp.path());

    let err = vault
        .replace(Path::new("GitHub/acme-widget.md"), "content")
        .await
        .unwrap_err();

    assert!(matches!(err, VaultError::NotFound(_)));
    assert!(!temp.path().join("GitHub").exists());

    std::fs::create_dir(temp.path().join("GitHub")).unwrap();
    let err = vault
        .replace(Path::new("GitHub/acme-widget.md"), "content")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound(_)));
    assert!(!temp.path().join("GitHub/acme-widget.md").exists());
}

#[test]
fn test_list_notes_skips_dot_dirs_and_other_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::create_dir_all(root.join("GitHub")).unwrap();
    std::fs::create_dir_all(root.join(".hubnotes/templates")).unwrap();
    std::fs::create_dir_all(root.join(".obsidian")).unwrap();
    std::fs::write(root.join("GitHub/b.md"), "").unwrap();
    std::fs::write(root.join("a.md"), "").unwrap();
    std::fs::write(root.join("image.png"), "").unwrap();
    std::fs::write(root.join(".hubnotes/templates/repository.md"), "").unwrap();
    std::fs::write(root.join(".obsidian/workspace.md"), "").unwrap();

    let notes = Vault::new(root).list_notes().unwrap();

    assert_eq!(notes, vec![PathBuf::from("GitHub/b.md"), PathBuf::from("a.md")]);
}

#[test]
fn test_resolve_absolute_and_relative() {
    let vault = Vault::new("/vault");
    assert_eq!(vault.resolve(Path::new("x.md")), PathBuf::from("/vault/x.md"));
    assert_eq!(vault.resolve(Path::new("/elsewhere/y.md")), PathBuf::from("/elsewhere/y.md"));
}
