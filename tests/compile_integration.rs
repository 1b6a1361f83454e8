mod common;

use common::Fixture;
use folio_core::compile::Compiler;
use folio_core::domain::Container;
use folio_core::error::{ErrorKind, FolioError};
use folio_core::metadata::MetadataIndex;
use folio_core::order::{OrderIndex, OrderTable};
use folio_core::settings::OutputTarget;
use folio_core::workspace::Workspace;
use std::fs;

fn draft() -> Fixture {
    let fx = Fixture::new();
    fx.note("Draft/A.md", Some("done"), "Alpha");
    fx.note("Draft/B.md", Some("writing"), "Beta");
    fx.note("Draft/C.md", Some("done"), "\n\nGamma\n");
    fx
}

fn vault_files(fx: &Fixture) -> usize {
    fs::read_dir(fx.root())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .count()
}

#[tokio::test]
async fn only_completed_notes_are_compiled() -> Result<(), FolioError> {
    let fx = draft();
    let compiler = Compiler::new(&fx.vault, MetadataIndex::new(&fx.vault, "idea"), None);
    let root = Container::new("Draft", "vault");

    let document = compiler.compile(&OrderIndex::new(), &root, false, "done").await?;
    assert_eq!(
        document,
        "# Draft\n\n## A\n\nAlpha\n\n***\n\n## C\n\nGamma\n\n\n***"
    );
    Ok(())
}

#[tokio::test]
async fn user_order_decides_the_sequence() -> Result<(), FolioError> {
    let fx = draft();
    let mut order = OrderIndex::new();
    order.set_order(
        OrderTable::Files,
        "Draft",
        vec!["Draft/C.md".into(), "Draft/B.md".into(), "Draft/A.md".into()],
    );
    let compiler = Compiler::new(&fx.vault, MetadataIndex::new(&fx.vault, "idea"), None);
    let plan = compiler.plan(&order, &Container::new("Draft", "vault"), false, "done")?;

    let names: Vec<_> = plan.groups[0].items.iter().map(|i| i.basename.as_str()).collect();
    assert_eq!(names, vec!["C", "A"]);
    Ok(())
}

#[tokio::test]
async fn nested_folders_get_deeper_headings() -> Result<(), FolioError> {
    let fx = Fixture::new();
    fx.note("Book/a.md", Some("done"), "a");
    fx.note("Book/Part/Part.md", Some("done"), "summary of the part");
    fx.note("Book/Part/b.md", Some("done"), "b");
    fx.note("Book/Part/Scene/c.md", Some("done"), "c");
    fx.note("Book/Empty/d.md", Some("writing"), "d");

    let compiler = Compiler::new(
        &fx.vault,
        MetadataIndex::new(&fx.vault, "idea"),
        Some("{{folder_name}}.md"),
    );
    let root = Container::new("Book", "vault");

    let plan = compiler.plan(&OrderIndex::new(), &root, true, "done")?;
    let depths: Vec<_> = plan.groups.iter().map(|g| (g.container.name.as_str(), g.depth)).collect();
    assert_eq!(depths, vec![("Book", 0), ("Part", 1), ("Scene", 2)]);
    assert_eq!(plan.item_count(), 3);

    let document = compiler.render(&plan).await?;
    assert_eq!(
        document,
        "# Book\n\n## a\n\na\n\n***\n\n## Part\n\n### b\n\nb\n\n***\n\n### Scene\n\n#### c\n\nc\n\n***"
    );
    Ok(())
}

#[tokio::test]
async fn vault_root_children_start_at_top_level_headings() -> Result<(), FolioError> {
    let fx = Fixture::new();
    fx.note("top.md", Some("done"), "t");
    fx.note("Part/b.md", Some("done"), "b");
    fx.note("Part/Scene/c.md", Some("done"), "c");

    let compiler = Compiler::new(&fx.vault, MetadataIndex::new(&fx.vault, "idea"), None);
    let root = Container::new("/", "Vault");

    let plan = compiler.plan(&OrderIndex::new(), &root, true, "done")?;
    let depths: Vec<_> = plan.groups.iter().map(|g| (g.container.name.as_str(), g.depth)).collect();
    assert_eq!(depths, vec![("Vault", 0), ("Part", 0), ("Scene", 1)]);

    let document = compiler.render(&plan).await?;
    assert_eq!(
        document,
        "# Vault\n\n## top\n\nt\n\n***\n\n# Part\n\n## b\n\nb\n\n***\n\n## Scene\n\n### c\n\nc\n\n***"
    );
    Ok(())
}

#[tokio::test]
async fn missing_status_falls_back_to_default() -> Result<(), FolioError> {
    let fx = Fixture::new();
    fx.note("Draft/plain.md", None, "no block");

    let compiler = Compiler::new(&fx.vault, MetadataIndex::new(&fx.vault, "done"), None);
    let document = compiler
        .compile(&OrderIndex::new(), &Container::new("Draft", "vault"), false, "done")
        .await?;
    assert_eq!(document, "# Draft\n\n## plain\n\nno block\n\n***");
    Ok(())
}

#[tokio::test]
async fn workspace_writes_a_timestamped_document() -> Result<(), FolioError> {
    let fx = draft();
    fx.folder("Exports");
    let mut ws = Workspace::open(&fx.vault, &fx.vault, &fx.store).await?;
    ws.select_container("Draft").await?;

    let report = ws.compile(Some("Exports")).await?;
    assert_eq!(report.item_count, 2);
    assert!(report.path.starts_with("Exports/Draft ("));
    assert!(report.path.ends_with(").md"));
    assert!(fx.read(&report.path).starts_with("# Draft\n\n## A\n\nAlpha"));
    Ok(())
}

#[tokio::test]
async fn nothing_to_compile_writes_nothing() -> Result<(), FolioError> {
    let fx = Fixture::new();
    fx.note("Draft/B.md", Some("writing"), "Beta");
    let mut ws = Workspace::open(&fx.vault, &fx.vault, &fx.store).await?;
    ws.select_container("Draft").await?;

    let err = ws.compile(None).await.unwrap_err();
    assert!(matches!(err, FolioError::NothingToCompile(ref s) if s == "done"));
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert_eq!(vault_files(&fx), 0);
    Ok(())
}

#[tokio::test]
async fn empty_completion_status_is_a_configuration_error() -> Result<(), FolioError> {
    let fx = draft();
    let mut ws = Workspace::open(&fx.vault, &fx.vault, &fx.store).await?;
    ws.select_container("Draft").await?;
    ws.update(|s| {
        s.completion_status_name.clear();
        Ok(())
    })
    .await?;

    let err = ws.compile(None).await.unwrap_err();
    assert!(matches!(err, FolioError::NoCompletionStatus));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(vault_files(&fx), 0);
    Ok(())
}

#[tokio::test]
async fn ask_every_time_needs_an_explicit_folder() -> Result<(), FolioError> {
    let fx = draft();
    let mut ws = Workspace::open(&fx.vault, &fx.vault, &fx.store).await?;
    ws.select_container("Draft").await?;
    ws.update(|s| {
        s.compile_output_path = OutputTarget::AskEveryTime;
        Ok(())
    })
    .await?;

    assert!(matches!(
        ws.compile(None).await.unwrap_err(),
        FolioError::OutputPathRequired
    ));

    let report = ws.compile(Some("/")).await?;
    assert!(!report.path.contains('/'));
    assert_eq!(vault_files(&fx), 1);
    Ok(())
}

#[tokio::test]
async fn missing_output_folder_is_not_found() -> Result<(), FolioError> {
    let fx = draft();
    let mut ws = Workspace::open(&fx.vault, &fx.vault, &fx.store).await?;
    ws.select_container("Draft").await?;

    let err = ws.compile(Some("Nowhere")).await.unwrap_err();
    assert!(matches!(err, FolioError::OutputFolderNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}
