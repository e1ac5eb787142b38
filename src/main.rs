fn main() -> std::io::Result<()> {
    elevator_dispatch::modules::run()
}
