// ctree: parse a C file and explore its syntax tree in the terminal

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use ctree::ast::Ast;
use ctree::parser::Parser;
use ctree::preprocessor::Preprocessor;
use ctree::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("ctree");

    let mut dump = false;
    let mut print = false;
    let mut preprocess = false;
    let mut file = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--dump" => dump = true,
            "--print" => print = true,
            "--cpp" => preprocess = true,
            _ => file = Some(arg.clone()),
        }
    }

    let Some(file) = file else {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} [--dump|--print] [--cpp] <file.c>", program_name);
        eprintln!();
        eprintln!("  --dump   print the node tree and exit");
        eprintln!("  --print  re-render the parsed source and exit");
        eprintln!("  --cpp    run the file through cc -E first");
        eprintln!();
        eprintln!("With no mode flag, an interactive tree inspector opens.");
        std::process::exit(1);
    };

    if !Path::new(&file).exists() {
        eprintln!("Error: File '{}' not found", file);
        std::process::exit(1);
    }

    let source = if preprocess {
        match Preprocessor::new().preprocess_file(&file) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    } else {
        fs::read_to_string(&file)?
    };

    let parser = Parser::new().with_filename(&file);
    let mut ast = Ast::new();
    let unit = match parser.parse(&mut ast, &source) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    };

    if dump {
        print!("{}", ast.dump(unit));
        return Ok(());
    }
    if print {
        println!("{}", ast.to_c(unit));
        return Ok(());
    }

    // The inspector shows the original text next to the tree, so keep the
    // un-preprocessed source on screen when possible
    let display_source = if preprocess {
        fs::read_to_string(&file).unwrap_or(source)
    } else {
        source
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(ast, unit, display_source);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
