use std::env;

pub fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Randuck - press the button, get a duck");
        println!("Usage: randuck");
        println!();
        if let Ok(path) = randuck::config::Config::get_path_string() {
            println!("Configuration File (optional): {}", path);
        }
        println!("Log filtering: RUST_LOG (default: randuck=info)");
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("randuck=info"))
        .init();

    randuck::gui::run()
}
