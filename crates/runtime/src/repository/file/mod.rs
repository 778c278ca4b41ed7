mod locations;

pub use locations::FileLocationRegistry;
