//! Dispatches a parsed [`crate::args::Cli`] to the matching `nb_sdk::Project`
//! method and renders the result. Every branch is a thin pass-through: the
//! CLI never reimplements planning, validation, or resolution logic.

use crate::args::{Cli, Commands, TransferArgs};
use crate::output;
use anyhow::{Context, Result};
use nb_sdk::{ConfigFields, Direction, Project, TransferOptions, Verbosity};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::MakeConfig {
            local_path,
            central_path,
            connection_method,
            central_host_id,
            central_host_username,
            aws_access_key_id,
            aws_region,
            gdrive_root_folder_id,
        } => {
            let fields = ConfigFields {
                central_path,
                connection_method: connection_method.map(Into::into),
                central_host_id,
                central_host_username,
                aws_access_key_id,
                aws_region,
                gdrive_client_id: None,
                gdrive_root_folder_id,
            };
            let project = Project::create(&cli.project, local_path, fields)
                .context("make_config_file failed")?;
            println!("created config for project '{}'", project.project_name());
            Ok(())
        }

        Commands::UpdateConfig {
            central_path,
            connection_method,
            central_host_id,
            central_host_username,
            aws_access_key_id,
            aws_region,
            gdrive_root_folder_id,
        } => {
            let mut project = Project::load(&cli.project).context("loading project")?;
            let fields = ConfigFields {
                central_path,
                connection_method: connection_method.map(Into::into),
                central_host_id,
                central_host_username,
                aws_access_key_id,
                aws_region,
                gdrive_client_id: None,
                gdrive_root_folder_id,
            };
            project.update_config_file(fields)?;
            println!("updated config for project '{}'", project.project_name());
            Ok(())
        }

        Commands::CreateFolders {
            top_level_folder,
            sub_names,
            ses_names,
            datatypes,
        } => {
            let project = Project::load(&cli.project).context("loading project")?;
            let created = project.create_folders(top_level_folder.into(), &sub_names, &ses_names, &datatypes)?;
            output::print_created_dirs(&created);
            Ok(())
        }

        Commands::Validate {
            top_level_folder,
            mode,
            include_central,
        } => {
            let project = Project::load(&cli.project).context("loading project")?;
            let issues = project.validate_project(top_level_folder.into(), mode.into(), include_central)?;
            output::print_issues(&issues);
            Ok(())
        }

        Commands::QuickValidate { top_level_folder } => {
            let project = Project::load(&cli.project).context("loading project")?;
            let issues = project.quick_validate_project(top_level_folder.into())?;
            output::print_issues(&issues);
            Ok(())
        }

        Commands::Upload(args) => run_transfer(&cli.project, Direction::Upload, args),
        Commands::Download(args) => run_transfer(&cli.project, Direction::Download, args),

        Commands::UploadRawdata => {
            let project = Project::load(&cli.project).context("loading project")?;
            output::print_transfer_result(&project.upload_rawdata(&TransferOptions::default())?);
            Ok(())
        }
        Commands::DownloadRawdata => {
            let project = Project::load(&cli.project).context("loading project")?;
            output::print_transfer_result(&project.download_rawdata(&TransferOptions::default())?);
            Ok(())
        }
        Commands::UploadDerivatives => {
            let project = Project::load(&cli.project).context("loading project")?;
            output::print_transfer_result(&project.upload_derivatives(&TransferOptions::default())?);
            Ok(())
        }
        Commands::DownloadDerivatives => {
            let project = Project::load(&cli.project).context("loading project")?;
            output::print_transfer_result(&project.download_derivatives(&TransferOptions::default())?);
            Ok(())
        }
        Commands::UploadEntireProject => {
            let project = Project::load(&cli.project).context("loading project")?;
            for summary in project.upload_entire_project(&TransferOptions::default())? {
                output::print_transfer_result(&summary);
            }
            Ok(())
        }
        Commands::DownloadEntireProject => {
            let project = Project::load(&cli.project).context("loading project")?;
            for summary in project.download_entire_project(&TransferOptions::default())? {
                output::print_transfer_result(&summary);
            }
            Ok(())
        }

        Commands::UploadPath { top_level_folder, path } => {
            let project = Project::load(&cli.project).context("loading project")?;
            let summary = project.transfer_specific_folder_or_file(
                Direction::Upload,
                top_level_folder.into(),
                &path,
                &TransferOptions::default(),
            )?;
            output::print_transfer_result(&summary);
            Ok(())
        }
        Commands::DownloadPath { top_level_folder, path } => {
            let project = Project::load(&cli.project).context("loading project")?;
            let summary = project.transfer_specific_folder_or_file(
                Direction::Download,
                top_level_folder.into(),
                &path,
                &TransferOptions::default(),
            )?;
            output::print_transfer_result(&summary);
            Ok(())
        }

        Commands::SetupSsh {
            ssh_keygen_binary,
            ssh_copy_id_binary,
            ssh_keyscan_binary,
            accept_host_key,
        } => {
            let project = Project::load(&cli.project).context("loading project")?;
            project.setup_ssh_connection(
                &ssh_keygen_binary,
                &ssh_copy_id_binary,
                &ssh_keyscan_binary,
                accept_host_key,
            )?;
            println!("ssh connection configured for project '{}'", project.project_name());
            Ok(())
        }

        Commands::SetupAws { rclone_binary, encrypt } => {
            let project = Project::load(&cli.project).context("loading project")?;
            project.setup_aws_connection(&rclone_binary, encrypt)?;
            println!("aws connection configured for project '{}'", project.project_name());
            Ok(())
        }

        Commands::SetupGdrive {
            rclone_binary,
            oauth_marker_file,
            poll_interval_secs,
        } => {
            let project = Project::load(&cli.project).context("loading project")?;
            // Interrupt-driven cancellation is a UI concern out of scope
            // for this thin binary; it only exposes the
            // cancel flag, it never wires it to a signal handler itself.
            let cancel = Arc::new(AtomicBool::new(false));

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("building tokio runtime")?;
            let poll = move || std::fs::read_to_string(&oauth_marker_file).ok().map(|s| s.trim().to_string());
            runtime.block_on(project.setup_gdrive_connection(
                &rclone_binary,
                cancel,
                std::time::Duration::from_secs(poll_interval_secs),
                poll,
            ))?;
            println!("google drive connection configured for project '{}'", project.project_name());
            Ok(())
        }

        Commands::NextSub { top_level_folder } => {
            let project = Project::load(&cli.project).context("loading project")?;
            output::print_next_name("next sub", &project.get_next_sub(top_level_folder.into()));
            Ok(())
        }

        Commands::NextSes { top_level_folder, sub } => {
            let project = Project::load(&cli.project).context("loading project")?;
            output::print_next_name("next ses", &project.get_next_ses(top_level_folder.into(), &sub));
            Ok(())
        }
    }
}

fn run_transfer(project_name: &str, direction: Direction, args: TransferArgs) -> Result<()> {
    let project = Project::load(project_name).context("loading project")?;
    let options = TransferOptions {
        overwrite: args.overwrite.into(),
        dry_run: args.dry_run,
        show_progress: args.progress,
        verbosity: match args.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        },
    };
    let summary = project.transfer_custom(
        direction,
        args.top_level_folder.into(),
        &args.sub_names,
        &args.ses_names,
        &args.datatypes,
        &options,
    )?;
    output::print_transfer_result(&summary);
    Ok(())
}
