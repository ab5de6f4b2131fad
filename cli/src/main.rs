#[macro_use] extern crate clap;

use clap::{App, ArgMatches};
use diskcatalog::{
    CatalogError, Disks, KindSet, MinimegaClient, Resolver, TopologyDirectory,
};
use env_logger::{from_env, Env};
use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

#[tokio::main]
async fn main() {
    let yaml = load_yaml!("cli.yml");
    let matches = App::from_yaml(yaml).get_matches();

    let log_level = matches.value_of("log_level").unwrap_or("warn");
    from_env(Env::default().default_filter_or(log_level)).init();

    if let Err(err) = run(&matches).await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(matches: &ArgMatches<'_>) -> Result<(), CatalogError> {
    let mut client = MinimegaClient::builder();
    if let Some(socket) = matches.value_of("socket") {
        client = client.socket(Path::new(socket));
    }
    if matches.is_present("timeout") {
        let secs = value_t!(matches, "timeout", u64).unwrap_or_else(|e| e.exit());
        client = client.timeout(Duration::from_secs(secs));
    }
    let client = Arc::new(client.build());

    match matches.subcommand() {
        ("list", Some(sub)) => {
            let topologies = TopologyDirectory::new(&topology_dir(matches));
            let mut resolver = Resolver::builder(client, topologies);
            if let Some(dir) = matches.value_of("files_dir") {
                resolver = resolver.files_dir(Path::new(dir));
            }
            if let Some(headnode) = matches.value_of("headnode") {
                resolver = resolver.headnode(headnode);
            }
            let resolver = resolver.build()?;

            let kinds = KindSet::parse(sub.value_of("kind").unwrap_or(""));
            let disks = resolver
                .catalog(sub.value_of("experiment"))
                .await?
                .select(&kinds, |_| true);
            let body = serde_json::json!({ "disks": disks });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        ("commit", Some(sub)) => {
            Disks::new(client).commit(&path_value(sub, "path")).await?;
        }
        ("snapshot", Some(sub)) => {
            let dst = Disks::new(client)
                .snapshot(&path_value(sub, "src"), &path_value(sub, "dst"))
                .await?;
            println!("{}", dst.display());
        }
        ("rebase", Some(sub)) => {
            Disks::new(client)
                .rebase(
                    &path_value(sub, "src"),
                    &path_value(sub, "dst"),
                    sub.is_present("unsafe"),
                )
                .await?;
        }
        ("clone", Some(sub)) => {
            Disks::new(client)
                .clone_disk(&path_value(sub, "src"), &path_value(sub, "dst"))
                .await?;
        }
        ("rename", Some(sub)) => {
            Disks::new(client)
                .rename(&path_value(sub, "src"), &path_value(sub, "dst"))
                .await?;
        }
        ("delete", Some(sub)) => {
            Disks::new(client).delete(&path_value(sub, "path")).await?;
        }
        (other, _) => log::warn!("unhandled subcommand {:?}", other),
    }
    Ok(())
}

fn topology_dir(matches: &ArgMatches) -> PathBuf {
    match matches.value_of("topologies") {
        Some(dir) => PathBuf::from(dir),
        None => match env::var("DISKCATALOG_TOPOLOGIES") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => PathBuf::from("topologies"),
        },
    }
}

fn path_value(matches: &ArgMatches, name: &str) -> PathBuf {
    PathBuf::from(matches.value_of(name).unwrap_or(""))
}
