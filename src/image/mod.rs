//! Image reference handling
//!
//! Mirror plans list source images as plain `name:tag` strings. This module
//! turns them into [`ImageReference`] values and derives the ECR address each
//! image is retagged and pushed to.
//!
//! # Examples
//!
//! ```
//! use ecr_image_mirror::image::{DestinationAddress, ImageReference};
//!
//! let image = ImageReference::parse("nginx:1.25").unwrap();
//! let destination = DestinationAddress::new("111122223333", "us-east-1", &image);
//! assert_eq!(
//!     destination.as_str(),
//!     "111122223333.dkr.ecr.us-east-1.amazonaws.com/nginx:1.25"
//! );
//! ```

pub mod reference;

pub use reference::{DestinationAddress, ImageReference, registry_host};
