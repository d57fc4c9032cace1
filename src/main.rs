fn main() {
    srcfetch::cli::run();
}
