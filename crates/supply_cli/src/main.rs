//! Command-line front end for the supply engine.
//!
//! # Responsibility
//! - Render the dashboard, supplier, manager and chart views as text.
//! - Forward write intent to engine mutation operations and re-render.
//! - Run the sync loop for a passive `watch` view.

mod cli;
mod render;

use clap::Parser;
use cli::{Cli, Command};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use supply_core::{
    init_logging, open_store, EngineConfig, NewOrder, QtyAdjustment, ServiceError, SortDirection,
    SortKey, SortState, SupplyService, SyncLoop, ViewQuery,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log directory `{}` is not UTF-8", log_dir.display()))?;
        init_logging(&config.log_level, log_dir)?;
    }

    let store = open_store(&config).map_err(|err| err.to_string())?;
    let service = Arc::new(SupplyService::new(store));

    match cli.command {
        Command::Show(view) => {
            let query = view_query(view.filter, view.sort.as_deref(), view.desc)?;
            let snapshot = service.snapshot(&query).map_err(report)?;
            print!("{}", render::full(&snapshot));
        }
        Command::Create(args) => {
            let id = service
                .create_order(&NewOrder {
                    material: args.material,
                    supplier: args.supplier,
                    eta: args.eta,
                    status: args.status,
                })
                .map_err(report)?;
            println!("created order #{id}");
            rerender(&service)?;
        }
        Command::Deliver { id } => {
            service.mark_delivered(id).map_err(report)?;
            rerender(&service)?;
        }
        Command::Eta { id, eta } => {
            service.update_eta(id, &eta).map_err(report)?;
            rerender(&service)?;
        }
        Command::Delay { id, reason, eta } => {
            service
                .report_delay(id, reason.as_deref().unwrap_or_default(), eta.as_deref())
                .map_err(report)?;
            rerender(&service)?;
        }
        Command::Inc { name } => {
            service
                .adjust_quantity(&name, QtyAdjustment::Increment)
                .map_err(report)?;
            rerender(&service)?;
        }
        Command::Dec { name } => {
            service
                .adjust_quantity(&name, QtyAdjustment::Decrement)
                .map_err(report)?;
            rerender(&service)?;
        }
        Command::Export { dir } => {
            let document = service.export().map_err(report)?;
            let path = dir.unwrap_or_else(|| PathBuf::from(".")).join(&document.file_name);
            std::fs::write(&path, document.contents)
                .map_err(|err| format!("failed to write `{}`: {err}", path.display()))?;
            println!("exported {}", path.display());
        }
        Command::Import { path } => {
            service.import_file(&path).map_err(report)?;
            println!("import successful");
            rerender(&service)?;
        }
        Command::Reset => {
            service.reset().map_err(report)?;
            rerender(&service)?;
        }
        Command::Watch { ticks } => watch(service, &config, ticks)?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig, String> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path).map_err(|err| err.to_string())?,
        None => EngineConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn view_query(filter: Option<String>, sort: Option<&str>, desc: bool) -> Result<ViewQuery, String> {
    let sort = match sort {
        Some(field) => {
            let key = SortKey::from_field(field)
                .ok_or_else(|| format!("unknown sort field `{field}`"))?;
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            SortState::by(key, direction)
        }
        None => SortState::default(),
    };
    Ok(ViewQuery {
        filter: filter.unwrap_or_default(),
        sort,
    })
}

fn rerender<S: supply_core::Store>(service: &SupplyService<S>) -> Result<(), String> {
    let snapshot = service.snapshot(&ViewQuery::default()).map_err(report)?;
    print!("{}", render::summary(&snapshot));
    Ok(())
}

fn watch<S>(
    service: Arc<SupplyService<S>>,
    config: &EngineConfig,
    ticks: Option<u64>,
) -> Result<(), String>
where
    S: supply_core::Store + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel();
    let sync = SyncLoop::spawn(
        service,
        ViewQuery::default(),
        config.sync_interval(),
        move |snapshot| {
            let _ = tx.send(snapshot);
        },
    )
    .map_err(|err| format!("failed to start sync loop: {err}"))?;

    let mut seen = 0u64;
    for snapshot in rx.iter() {
        match snapshot {
            Ok(snapshot) => print!("{}", render::summary(&snapshot)),
            Err(err) => warn!("event=watch_refresh module=cli status=error error_code={}", err.code()),
        }
        seen += 1;
        if ticks.is_some_and(|limit| seen >= limit) {
            break;
        }
    }
    sync.stop();
    Ok(())
}

fn report(err: ServiceError) -> String {
    err.to_string()
}
