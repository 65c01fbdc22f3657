mod elapsed;
mod mic_lease;
