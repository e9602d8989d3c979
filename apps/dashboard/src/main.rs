use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::backend::HttpBackend;
use client_core::convert::FormatSlot;
use client_core::facet::FacetView;
use client_core::{ClientEvent, DashboardClient, Session};
use shared::domain::{CType, DocId, ScopeId, SeqId, TagId};
use shared::protocol::{CreatePayload, DocumentSummary, SequenceMember, UpdatePayload};
use tokio::sync::broadcast;
use tracing::info;
use url::Url;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides the configured backend root.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue a token and store the session locally.
    Login { email: String, password: String },
    /// Revoke the stored token and forget the session.
    Logout,
    /// Fetch the document list under the current facet selection.
    List {
        /// Deselect these scopes before listing.
        #[arg(long = "drop-scope")]
        drop_scope: Vec<i32>,
        /// Narrow the list to exactly this tag.
        #[arg(long)]
        tag: Option<i32>,
    },
    /// Publish a document and show its content and format slots.
    Doc { doc_id: i32 },
    /// Request conversion of a document into one catalog format.
    Convert { doc_id: i32, c_type: i32 },
    /// Create a document from a local markdown file.
    Write {
        file: PathBuf,
        /// Scopes to file the document under; defaults to every held scope.
        #[arg(long = "scope")]
        scope: Vec<i32>,
        #[arg(long = "tag")]
        tag: Vec<String>,
        #[arg(long = "seq")]
        seq: Option<i32>,
    },
    /// Revise an existing document from a local markdown file.
    Update {
        doc_id: i32,
        file: PathBuf,
        /// Scopes to file the revision under; defaults to every held scope.
        #[arg(long = "scope")]
        scope: Vec<i32>,
        #[arg(long = "tag")]
        tag: Vec<String>,
        #[arg(long = "seq")]
        seq: Option<i32>,
    },
    /// Delete documents by id.
    Delete { doc_ids: Vec<i32> },
    /// List sequences across every held scope.
    Seqs,
    /// Create a sequence.
    SeqNew {
        title: String,
        /// Scopes the sequence lives in; defaults to every held scope.
        #[arg(long = "scope")]
        scope: Vec<i32>,
    },
    /// Delete a sequence.
    SeqDel { seq_id: i32 },
    /// Show a sequence's members in reading order.
    Seq { seq_id: i32 },
    /// Move a document one place earlier and persist the new order.
    SeqUp { seq_id: i32, doc_id: i32 },
    /// Move a document one place later and persist the new order.
    SeqDown { seq_id: i32, doc_id: i32 },
    /// Add a document to a sequence.
    SeqIn { seq_id: i32, doc_id: i32 },
    /// Remove a document from a sequence.
    SeqOut { seq_id: i32, doc_id: i32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    Url::parse(&settings.server_url)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    info!(server_url = %settings.server_url, "dashboard client starting");

    let backend = Arc::new(HttpBackend::new(settings.server_url.clone()));
    let client = DashboardClient::new(backend);
    let mut notices = client.subscribe_events();

    let outcome = run(cli.command, &client, &settings).await;
    print_notices(&mut notices);
    outcome
}

async fn run(command: Command, client: &DashboardClient, settings: &Settings) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            let raw = serde_json::to_string_pretty(&session)?;
            fs::write(&settings.session_file, raw).with_context(|| {
                format!(
                    "failed to write session file '{}'",
                    settings.session_file.display()
                )
            })?;
            println!("logged in; {} scope(s) held", session.scopes.len());
        }
        Command::Logout => {
            restore(client, settings).await?;
            let outcome = client.logout().await;
            // The local session is gone either way.
            let _ = fs::remove_file(&settings.session_file);
            outcome?;
        }
        Command::List { drop_scope, tag } => {
            restore(client, settings).await?;
            client.refresh().await?;
            for scope_id in drop_scope {
                client.toggle_scope(ScopeId(scope_id)).await?;
            }
            if let Some(tag_id) = tag {
                client.toggle_tag(TagId(tag_id)).await?;
                client.refresh_documents().await?;
            }
            print_facets(&client.facets().await);
            print_documents(&client.documents().await);
        }
        Command::Doc { doc_id } => {
            restore(client, settings).await?;
            let detail = client.open_document(DocId(doc_id)).await?;
            println!("#{} {} (status {})", detail.id.0, detail.title, detail.status);
            println!("updated {}", detail.updated_at);
            if !detail.tags.is_empty() {
                let tags: Vec<&str> = detail.tags.iter().map(|tag| tag.value.as_str()).collect();
                println!("tags: {}", tags.join(", "));
            }
            println!("{}", detail.data);
            println!("formats:");
            for slot in client.conversion_slots().await? {
                match slot {
                    FormatSlot::Available {
                        c_type,
                        extension,
                        object_id,
                    } => {
                        println!(
                            "  {} .{extension} ready: {}",
                            c_type.0,
                            client.file_url(&object_id)
                        );
                    }
                    FormatSlot::Pending { c_type, extension } => {
                        println!("  {} .{extension} not produced yet", c_type.0);
                    }
                }
            }
        }
        Command::Convert { doc_id, c_type } => {
            restore(client, settings).await?;
            client
                .request_conversion(DocId(doc_id), CType(c_type))
                .await?;
        }
        Command::Write {
            file,
            scope,
            tag,
            seq,
        } => {
            restore(client, settings).await?;
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let scope_ids = scope_ids_or_held(client, scope).await;
            client
                .create_document(CreatePayload {
                    raw,
                    tags: tag,
                    scope_ids,
                    seq_id: seq.map(SeqId),
                })
                .await?;
        }
        Command::Update {
            doc_id,
            file,
            scope,
            tag,
            seq,
        } => {
            restore(client, settings).await?;
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let scope_ids = scope_ids_or_held(client, scope).await;
            client
                .update_document(UpdatePayload {
                    doc_id: DocId(doc_id),
                    raw,
                    tags: tag,
                    scope_ids,
                    seq_id: seq.map(SeqId),
                })
                .await?;
        }
        Command::Delete { doc_ids } => {
            restore(client, settings).await?;
            let doc_ids: Vec<DocId> = doc_ids.into_iter().map(DocId).collect();
            client.delete_documents(&doc_ids).await?;
        }
        Command::Seqs => {
            restore(client, settings).await?;
            let sequences = client.list_sequences().await?;
            println!("{} sequence(s)", sequences.len());
            for sequence in sequences {
                println!("  {:>4}  {}", sequence.id.0, sequence.title);
            }
        }
        Command::SeqNew { title, scope } => {
            restore(client, settings).await?;
            let scope_ids = scope_ids_or_held(client, scope).await;
            client.create_sequence(&scope_ids, &title).await?;
        }
        Command::SeqDel { seq_id } => {
            restore(client, settings).await?;
            client.delete_sequence(SeqId(seq_id)).await?;
        }
        Command::Seq { seq_id } => {
            restore(client, settings).await?;
            let members = client.load_sequence(SeqId(seq_id)).await?;
            print_members(&members);
        }
        Command::SeqUp { seq_id, doc_id } => {
            restore(client, settings).await?;
            client.load_sequence(SeqId(seq_id)).await?;
            if client.sequence_move_up(DocId(doc_id)).await? {
                client.commit_sequence().await?;
                print_members(&client.sequence_members().await?);
            } else {
                println!("doc {doc_id} did not move");
            }
        }
        Command::SeqDown { seq_id, doc_id } => {
            restore(client, settings).await?;
            client.load_sequence(SeqId(seq_id)).await?;
            if client.sequence_move_down(DocId(doc_id)).await? {
                client.commit_sequence().await?;
                print_members(&client.sequence_members().await?);
            } else {
                println!("doc {doc_id} did not move");
            }
        }
        Command::SeqIn { seq_id, doc_id } => {
            restore(client, settings).await?;
            client
                .sequence_add_document(SeqId(seq_id), DocId(doc_id))
                .await?;
        }
        Command::SeqOut { seq_id, doc_id } => {
            restore(client, settings).await?;
            client
                .sequence_remove_document(SeqId(seq_id), DocId(doc_id))
                .await?;
        }
    }

    Ok(())
}

async fn restore(client: &DashboardClient, settings: &Settings) -> Result<()> {
    let raw = fs::read_to_string(&settings.session_file).with_context(|| {
        format!(
            "no stored session at '{}'; run login first",
            settings.session_file.display()
        )
    })?;
    let session: Session =
        serde_json::from_str(&raw).context("stored session file is not valid JSON")?;
    client.restore_session(session).await;
    Ok(())
}

async fn scope_ids_or_held(client: &DashboardClient, scope: Vec<i32>) -> Vec<ScopeId> {
    if scope.is_empty() {
        client
            .session()
            .await
            .map(|session| session.scopes.iter().map(|scope| scope.id).collect())
            .unwrap_or_default()
    } else {
        scope.into_iter().map(ScopeId).collect()
    }
}

fn print_facets(view: &FacetView) {
    println!("scopes:");
    for (scope, selected) in &view.scopes {
        let mark = if *selected { "x" } else { " " };
        println!("  [{mark}] {:>4}  {}", scope.id.0, scope.name);
    }
    if !view.tags.is_empty() {
        println!("tags:");
        for (tag, active) in &view.tags {
            let mark = if *active { "x" } else { " " };
            println!("  [{mark}] {:>4}  {}", tag.id.0, tag.value);
        }
    }
}

fn print_documents(documents: &[DocumentSummary]) {
    println!("{} document(s)", documents.len());
    for doc in documents {
        println!("  {:>4}  {}  {}", doc.id.0, doc.updated_at, doc.title);
    }
}

fn print_members(members: &[SequenceMember]) {
    println!("{} member(s)", members.len());
    for member in members {
        println!("  {:>3}. doc {:>4}  {}", member.seq_order, member.id.0, member.title);
    }
}

fn print_notices(notices: &mut broadcast::Receiver<ClientEvent>) {
    while let Ok(event) = notices.try_recv() {
        if let ClientEvent::Notice { pass, message } = event {
            let status = if pass { "ok" } else { "failed" };
            println!("[{status}] {message}");
        }
    }
}
