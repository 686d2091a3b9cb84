pub mod homography;
