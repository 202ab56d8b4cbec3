//! Event rendering for the terminal

use console::style;
use nutforge_events::{
    AcquisitionEvent, AppEvent, BootstrapEvent, BuildEvent, GeneralEvent, InstallEvent,
    ResolverEvent, VerifyEvent,
};

/// Renders pipeline events as human-readable lines
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        event.trace();

        match event {
            AppEvent::General(e) => self.handle_general(e),
            AppEvent::Acquisition(e) => self.handle_acquisition(&e),
            AppEvent::Resolver(e) => self.handle_resolver(&e),
            AppEvent::Build(e) => self.handle_build(&e),
            AppEvent::Install(e) => self.handle_install(&e),
            AppEvent::Bootstrap(e) => self.handle_bootstrap(&e),
            AppEvent::Verify(e) => self.handle_verify(&e),
        }
    }

    fn handle_general(&self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => {
                let prefix = self.paint_yellow("Warning:");
                match context {
                    Some(context) => eprintln!("{prefix} {message} ({context})"),
                    None => eprintln!("{prefix} {message}"),
                }
            }
            GeneralEvent::Error { message, details } => {
                let prefix = self.paint_red("Error:");
                match details {
                    Some(details) => eprintln!("{prefix} {message}\n  {details}"),
                    None => eprintln!("{prefix} {message}"),
                }
            }
            GeneralEvent::DebugLog { message } => {
                if self.debug_enabled {
                    eprintln!("{} {message}", self.paint_dim("debug:"));
                }
            }
            GeneralEvent::OperationStarted { operation } => {
                println!("{} {operation}", self.paint_cyan("==>"));
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if success {
                    println!("{} {operation}", self.paint_green("ok:"));
                } else {
                    eprintln!("{} {operation}", self.paint_red("failed:"));
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                eprintln!("{} {operation}: {error}", self.paint_red("failed:"));
            }
        }
    }

    fn handle_acquisition(&self, event: &AcquisitionEvent) {
        match event {
            AcquisitionEvent::FetchStarted { url } => {
                println!("{} Fetching {url}", self.paint_cyan("==>"));
            }
            AcquisitionEvent::FetchCompleted { bytes, .. } => {
                if self.debug_enabled {
                    eprintln!("{} fetched {bytes} bytes", self.paint_dim("debug:"));
                }
            }
            AcquisitionEvent::ChecksumVerified { digest, .. } => {
                println!("{} Checksum verified ({digest})", self.paint_green("ok:"));
            }
        }
    }

    fn handle_resolver(&self, event: &ResolverEvent) {
        match event {
            ResolverEvent::Started { count } => {
                println!(
                    "{} Resolving {count} dependencies",
                    self.paint_cyan("==>")
                );
            }
            ResolverEvent::LibraryResolved { name, lib_dir, .. } => {
                println!("    {name} -> {}", lib_dir.display());
            }
            ResolverEvent::ToolResolved { name, path } => {
                println!("    {name} -> {}", path.display());
            }
            ResolverEvent::Completed { resolved } => {
                println!(
                    "{} {resolved} dependencies resolved",
                    self.paint_green("ok:")
                );
            }
        }
    }

    fn handle_build(&self, event: &BuildEvent) {
        match event {
            BuildEvent::SourceExtracted { source_dir } => {
                println!(
                    "{} Source unpacked at {}",
                    self.paint_cyan("==>"),
                    source_dir.display()
                );
            }
            BuildEvent::CommandStarted {
                command,
                working_dir,
            } => {
                println!(
                    "{} {command} (in {})",
                    self.paint_cyan("==>"),
                    working_dir.display()
                );
            }
            BuildEvent::CommandCompleted { command, exit_code } => {
                if self.debug_enabled {
                    eprintln!(
                        "{} {command} exited with {exit_code}",
                        self.paint_dim("debug:")
                    );
                }
            }
            BuildEvent::Completed { artifact } => {
                println!(
                    "{} Built {}",
                    self.paint_green("ok:"),
                    artifact.display()
                );
            }
        }
    }

    fn handle_install(&self, event: &InstallEvent) {
        match event {
            InstallEvent::StagingStarted { prefix } => {
                println!(
                    "{} Installing into {}",
                    self.paint_cyan("==>"),
                    prefix.display()
                );
            }
            InstallEvent::FileStaged { path } => {
                if self.debug_enabled {
                    eprintln!("{} staged {}", self.paint_dim("debug:"), path.display());
                }
            }
            InstallEvent::StagingCompleted { prefix, files } => {
                println!(
                    "{} {files} files installed into {}",
                    self.paint_green("ok:"),
                    prefix.display()
                );
            }
        }
    }

    fn handle_bootstrap(&self, event: &BootstrapEvent) {
        match event {
            BootstrapEvent::Started { user_root } => {
                println!(
                    "{} Preparing {}",
                    self.paint_cyan("==>"),
                    user_root.display()
                );
            }
            BootstrapEvent::ThemesSeeded { count } => {
                println!("{} Seeded {count} default themes", self.paint_green("ok:"));
            }
            BootstrapEvent::SeedSkipped { reason } => {
                println!("    keeping existing themes ({reason})");
            }
            BootstrapEvent::Notice { message } => {
                println!("{} {message}", self.paint_cyan("==>"));
            }
            BootstrapEvent::Completed { .. } => {}
        }
    }

    fn handle_verify(&self, event: &VerifyEvent) {
        match event {
            VerifyEvent::SmokeTestStarted { binary } => {
                println!(
                    "{} Smoke-testing {}",
                    self.paint_cyan("==>"),
                    binary.display()
                );
            }
            VerifyEvent::SmokeTestPassed { binary } => {
                println!(
                    "{} {} identifies itself correctly",
                    self.paint_green("ok:"),
                    binary.display()
                );
            }
        }
    }

    fn paint_cyan(&self, s: &str) -> String {
        if self.colors_enabled {
            style(s).cyan().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_green(&self, s: &str) -> String {
        if self.colors_enabled {
            style(s).green().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_yellow(&self, s: &str) -> String {
        if self.colors_enabled {
            style(s).yellow().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_red(&self, s: &str) -> String {
        if self.colors_enabled {
            style(s).red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_dim(&self, s: &str) -> String {
        if self.colors_enabled {
            style(s).dim().to_string()
        } else {
            s.to_string()
        }
    }
}
