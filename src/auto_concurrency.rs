// Worker-count chooser used when no explicit -c is given.
// Scales with the square root of the batch size so small batches stay
// nearly serial and large batches saturate at a practical ceiling.
pub fn choose_workers(total_files: usize) -> usize {
    if total_files <= 1 {
        return 1;
    }
    let base = (total_files as f64).sqrt().round() as usize;
    base.clamp(2, 16)
}
