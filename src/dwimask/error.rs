use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaskError {
    #[error(
        "For \"ants\" dwi2mask algorithm, -template command-line option is currently mandatory"
    )]
    MissingTemplate,

    #[error("Environment variable ANTSPATH is not set; please appropriately configure ANTs software")]
    AntsPathUnset,

    #[error("Unable to find command \"{0}\"; please check {1} installation")]
    ExecutableNotFound(String, &'static str),

    #[error("Output \"{}\" already exists (use -force to override)", .0.display())]
    OutputExists(PathBuf),

    #[error("Command failed: {command} ({status})\n{stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Expected output \"{}\" was not produced by {}", .0.display(), .1)]
    MissingOutput(PathBuf, String),

    #[error("Image header error: {0}")]
    Header(String),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_output_message_names_file_and_tool() {
        let err = MaskError::MissingOutput(
            PathBuf::from("/scratch/outBrainExtractionMask.nii.gz"),
            "antsBrainExtraction.sh".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Expected output \"/scratch/outBrainExtractionMask.nii.gz\" was not produced by antsBrainExtraction.sh"
        );
    }

    #[test]
    fn test_io_errors_convert() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/dwimask/header.json")?)
        }
        assert!(matches!(read(), Err(MaskError::Io(_))));
    }

    #[test]
    fn test_output_exists_message() {
        let err = MaskError::OutputExists(PathBuf::from("mask.mif"));
        assert_eq!(
            err.to_string(),
            "Output \"mask.mif\" already exists (use -force to override)"
        );
    }
}
