use chrono::Utc;
use clap::{Args, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use kpr_sim_core::catalogue::custom_links::CustomLinks;
use kpr_sim_core::catalogue::files::{self, DeletionPlan, SalesFile};
use kpr_sim_core::catalogue::query::{self, CatalogueQuery, SortOrder};
use kpr_sim_core::catalogue::upload::{self, UploadCandidate};
use kpr_sim_core::KprSimError;

use crate::commands::open_store;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Newest,
    Name,
}

impl From<SortArg> for SortOrder {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Newest => SortOrder::Newest,
            SortArg::Name => SortOrder::Name,
        }
    }
}

#[derive(Subcommand)]
pub enum FilesCommand {
    /// Search and list the sales file catalogue
    List(ListArgs),
    /// List every tag in use
    Tags(RemoteArgs),
    /// Save a link to the local catalogue
    AddLink(AddLinkArgs),
    /// Remove an uploaded file or a saved link
    Delete(DeleteArgs),
    /// Validate a file for upload and show where it would be stored
    PlanUpload(PlanUploadArgs),
}

#[derive(Args)]
pub struct RemoteArgs {
    /// JSON or YAML export of uploaded file records
    #[arg(long)]
    pub remote: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Case-insensitive title search
    #[arg(long, default_value = "")]
    pub search: String,

    /// Only files carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long, value_enum, default_value = "newest")]
    pub sort: SortArg,
}

#[derive(Args)]
pub struct AddLinkArgs {
    #[arg(long)]
    pub url: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    #[arg(long)]
    pub id: String,
}

#[derive(Args)]
pub struct PlanUploadArgs {
    /// Local file to upload
    #[arg(long)]
    pub file: String,

    /// Display title (defaults to the file name)
    #[arg(long, default_value = "")]
    pub title: String,

    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,

    /// MIME type (guessed from the extension when omitted)
    #[arg(long)]
    pub mime: Option<String>,
}

fn catalogue(
    remote: &RemoteArgs,
    data_dir: &Path,
) -> Result<Vec<SalesFile>, Box<dyn std::error::Error>> {
    let uploaded: Vec<SalesFile> = match &remote.remote {
        Some(path) => input::file::read_input(path)?,
        None => Vec::new(),
    };
    let store = open_store(data_dir)?;
    let custom = CustomLinks::new(&store).list()?;
    Ok(files::merge(files::seed_files(), uploaded, custom))
}

pub fn run_files(
    command: FilesCommand,
    data_dir: &Path,
) -> Result<Value, Box<dyn std::error::Error>> {
    match command {
        FilesCommand::List(args) => {
            let all = catalogue(&args.remote, data_dir)?;
            let query = CatalogueQuery {
                search: args.search,
                tag: args.tag,
                sort: args.sort.into(),
            };
            Ok(serde_json::to_value(query::filter_files(&all, &query))?)
        }
        FilesCommand::Tags(remote) => {
            let all = catalogue(&remote, data_dir)?;
            Ok(serde_json::to_value(query::all_tags(&all))?)
        }
        FilesCommand::AddLink(args) => {
            let now = Utc::now();
            let link = files::new_custom_link(&args.url, now.date_naive(), now.timestamp_millis())?;
            let store = open_store(data_dir)?;
            CustomLinks::new(&store).add(link.clone())?;
            Ok(json!({ "result": link }))
        }
        FilesCommand::Delete(args) => {
            let all = catalogue(&args.remote, data_dir)?;
            let file = all
                .iter()
                .find(|f| f.id == args.id)
                .ok_or_else(|| KprSimError::NotFound(format!("file '{}'", args.id)))?;

            let plan = files::plan_deletion(file)?;
            if let DeletionPlan::RemoveCustomLink { id } = &plan {
                let store = open_store(data_dir)?;
                CustomLinks::new(&store).remove(id)?;
            }
            Ok(json!({ "result": plan }))
        }
        FilesCommand::PlanUpload(args) => {
            let path = input::file::resolve_path(&args.file)?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or("File name is not valid UTF-8")?
                .to_string();
            let mime_type = match args.mime {
                Some(m) => m,
                None => upload::mime_from_extension(&file_name)
                    .ok_or_else(|| KprSimError::UnsupportedFileType {
                        mime_type: format!("unknown ({file_name})"),
                    })?
                    .to_string(),
            };
            let candidate = UploadCandidate {
                file_name,
                mime_type,
                size_bytes: fs::metadata(&path)?.len(),
                title: args.title,
                tags_csv: args.tags,
            };
            let plan = upload::plan_upload(&candidate, Utc::now())?;
            Ok(json!({ "result": plan }))
        }
    }
}
