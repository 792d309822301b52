/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Linear downscale factor for the registration proxy.
pub const DEFAULT_REGISTRATION_SCALE: f64 = 0.5;

/// Iteration cap for ECC maximization.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// ECC stops once the correlation improves by less than this.
pub const DEFAULT_ECC_EPSILON: f64 = 1e-5;

/// Gaussian pre-smoothing kernel size for ECC (0 disables).
pub const DEFAULT_GAUSS_FILTER_SIZE: usize = 5;

/// Side length of the square output crop.
pub const DEFAULT_CROP_SIZE: usize = 512;

/// Value used for resampled pixels that fall outside the source frame.
pub const BORDER_VALUE: u8 = 0;

/// Fewer valid overlapping pixels than this is treated as a failed registration.
pub const MIN_OVERLAP_PIXELS: usize = 16;

/// Standard deviation below which a proxy image counts as flat.
pub const FLAT_STD_THRESHOLD: f64 = 1e-6;

/// Input extensions recognized by the loader when none are configured.
pub const DEFAULT_INPUT_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// Extension of the written pair images.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "tif";

pub const NOISY_DIR_NAME: &str = "noisy";
pub const GT_DIR_NAME: &str = "gt";

/// File name of the side-by-side comparison image.
pub const COMPARISON_FILE_NAME: &str = "comparison.png";

/// Width of the white gutter between comparison panels.
pub const COMPARISON_GUTTER: u32 = 8;
