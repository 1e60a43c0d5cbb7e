fn main() {
    pollster::block_on(sundial::run());
}
