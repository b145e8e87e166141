use std::process;

fn main() {
    match markdown_bundle_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-bundle error: {err}");
            process::exit(1);
        }
    }
}
