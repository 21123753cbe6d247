fn main() {
    use modgraph::cli::parse;
    let cli = parse();
    let code = modgraph::app::run_cli(cli);
    if code != 0 { std::process::exit(code); }
}
