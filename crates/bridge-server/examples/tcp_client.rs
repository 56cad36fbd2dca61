use std::env;
use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("BRIDGE_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:8765".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected.");
    println!("Type bridge messages like:");
    println!("  {{\"type\":\"questcard_positions\",\"positions\":[1,48,24]}}");
    println!("  {{\"type\":\"piece_color\",\"color\":[255,0,0]}}");
    println!("  {{\"type\":\"init_effect\"}}");
    println!("  42   (raw token, relayed to the other clients)");
    println!("Type 'quit' or 'exit' to leave.\n");

    let (read_half, mut write_half) = stream.into_split();

    // Print whatever the bridge broadcasts (sensor ids, EFFECT_DONE).
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("<< {}", line);
        }
        println!("\nServer closed the connection.");
    });

    let stdin = io::stdin();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            // EOF
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        write_half.write_all(trimmed.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    Ok(())
}
