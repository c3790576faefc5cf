fn main() {
    // Exports ESP-IDF linker/env metadata when building for the espidf
    // target; emits nothing on host builds.
    embuild::espidf::sysenv::output();
}
