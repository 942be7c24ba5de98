fn main() {
    if let Err(err) = devdiag::cli::run() {
        devdiag::ui::eprintln_error(&err);
        std::process::exit(devdiag::exit::exit_code(&err));
    }
}
