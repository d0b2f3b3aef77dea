use android_run_lib::app::relay::RelayOutcome;

fn main() {
    match android_run_lib::run() {
        Ok(RelayOutcome::Exit(code)) => std::process::exit(code),
        // The device's signal cannot be re-raised here; SIGABRT is what crash-expecting
        // harnesses look for.
        Ok(RelayOutcome::Abort { .. }) => std::process::abort(),
        Err(err) => {
            eprintln!("android_run: {err}");
            std::process::exit(1);
        }
    }
}
