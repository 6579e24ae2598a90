use anyhow::Result;

fn main() -> Result<()> {
    nsprefix_cli::main_entry()
}
