use colfm::{
  App,
  runtime,
  trace,
};

fn print_version()
{
  println!("colfm {}", env!("CARGO_PKG_VERSION"));
}

fn print_help()
{
  println!(
    "Usage: colfm [OPTIONS] [DIR]\n\n\
     Options:\n\
       -h, --help            Show this help and exit\n\
       -V, --version         Show version and exit\n\
           --config-dir DIR  Use DIR as the config root (sets COLFM_CONFIG_DIR)\n\
           --cwd-file FILE   Write the final directory to FILE on exit\n\
           --trace[=FILE]    Enable tracing to FILE (default /tmp/colfm-trace.log)\n\
     Arguments:\n\
       DIR                   Start in directory DIR (default: current dir)\n"
  );
}

fn main() -> Result<(), Box<dyn std::error::Error>>
{
  use std::env;
  trace::install_panic_hook();

  let mut args = env::args().skip(1);
  let mut dir_arg: Option<String> = None;
  let mut cwd_file: Option<String> = None;
  while let Some(a) = args.next()
  {
    match a.as_str()
    {
      "-h" | "--help" =>
      {
        print_help();
        return Ok(());
      }
      "-V" | "--version" =>
      {
        print_version();
        return Ok(());
      }
      s if s == "--trace" || s.starts_with("--trace=") =>
      {
        let file = s.split_once('=').map(|(_, f)| f.to_string()).unwrap_or_default();
        // Single-threaded at this point.
        unsafe { env::set_var("COLFM_TRACE", "1") };
        if !file.is_empty()
        {
          unsafe { env::set_var("COLFM_TRACE_FILE", file) };
        }
      }
      "--config-dir" =>
      {
        if let Some(dir) = args.next()
        {
          unsafe { env::set_var("COLFM_CONFIG_DIR", &dir) };
        }
        else
        {
          eprintln!("colfm: --config-dir requires a DIR argument");
          print_help();
          std::process::exit(2);
        }
      }
      s if s.starts_with("--config-dir=") =>
      {
        if let Some((_, dir)) = s.split_once('=')
        {
          unsafe { env::set_var("COLFM_CONFIG_DIR", dir) };
        }
      }
      "--cwd-file" =>
      {
        cwd_file = args.next();
        if cwd_file.is_none()
        {
          eprintln!("colfm: --cwd-file requires a FILE argument");
          print_help();
          std::process::exit(2);
        }
      }
      s if s.starts_with("--cwd-file=") =>
      {
        cwd_file = s.split_once('=').map(|(_, f)| f.to_string());
      }
      "--" =>
      {
        dir_arg = args.next();
        break;
      }
      s if s.starts_with('-') =>
      {
        eprintln!("colfm: unknown option: {}", s);
        print_help();
        std::process::exit(2);
      }
      other =>
      {
        if dir_arg.is_none()
        {
          dir_arg = Some(other.to_string());
        }
      }
    }
  }

  if let Some(dir) = dir_arg
    && let Err(e) = env::set_current_dir(&dir)
  {
    eprintln!("colfm: failed to change directory to '{}': {}", dir, e);
    std::process::exit(1);
  }

  trace::log("[main] starting colfm");
  let mut app = App::new()?;
  if let Err(e) = runtime::run_app(&mut app)
  {
    trace::log(format!("[error] runtime::run_app: {e}"));
    return Err(e);
  }

  let last = app.on_exit();
  println!("{}", last.display());
  if let Some(file) = cwd_file
    && let Err(e) = std::fs::write(&file, format!("{}\n", last.display()))
  {
    eprintln!("colfm: cannot write '{}': {}", file, e);
  }
  Ok(())
}
