use clap::Subcommand;
use zenith_core::camera::{CameraSession, SyntheticSource};

use crate::common::CliResult;

#[derive(Subcommand)]
pub enum CameraAction {
    /// Open the camera, grab one frame and release it
    Capture {
        /// Print the full data URL instead of a summary
        #[arg(long)]
        data_url: bool,
    },
}

pub fn run(action: CameraAction) -> CliResult {
    match action {
        CameraAction::Capture { data_url } => {
            let mut source = SyntheticSource::new(64, 48);
            let mut session = CameraSession::acquire(&mut source)?;
            let image = session.capture()?;
            session.release();

            let url = image.data_url();
            if data_url {
                println!("{url}");
            } else {
                println!(
                    "captured {}x{} frame ({} bytes as data URL)",
                    image.size.width,
                    image.size.height,
                    url.len()
                );
            }
        }
    }
    Ok(())
}
