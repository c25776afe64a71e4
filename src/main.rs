use ecr_image_mirror::Logger;
use ecr_image_mirror::cli::{Args, Runner};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();

    let output = if args.quiet {
        Logger::new_quiet()
    } else {
        Logger::new(args.verbose)
    };

    // Required inputs are checked before anything external is touched.
    let context = match args.validate() {
        Ok(context) => context,
        Err(e) => {
            output.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    if context.mode.is_dry_run() {
        output.warning("Dry run: nothing will be pulled, pushed or created");
    }

    match Runner::new(context, output.clone()).run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
