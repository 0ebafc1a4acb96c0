fn main() -> std::process::ExitCode {
    tap_csv_lib::run()
}
