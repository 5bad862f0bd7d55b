fn main() {
    // embuild is only pulled in by the espidf feature.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
