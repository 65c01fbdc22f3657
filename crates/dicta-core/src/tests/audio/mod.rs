mod adapter;
mod capture;
mod encoder;
mod resampler;
