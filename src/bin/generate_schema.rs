//! Prints the JSON schema of the `ogonki` config file.

fn main() {
    println!("{}", ogonki::config::Config::schema_json());
}
