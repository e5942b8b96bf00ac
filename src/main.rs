fn main() {
    dlprefs::cli::run();
}
