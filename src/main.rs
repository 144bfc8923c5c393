fn main() {
    debgraph::cli::run();
}
