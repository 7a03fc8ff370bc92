use super::args::*;

pub mod config;
pub mod publish;
pub mod uid;
pub mod validate;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Config(args) => config::run(args),
        Command::Validate => validate::run(),
        Command::Uid => uid::run(),
        Command::Publish(args) => publish::run(args).await,
    }
}
