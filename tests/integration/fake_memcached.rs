//! Throwaway Memcached text-protocol server for driving the binary

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Start a server on an ephemeral loopback port and return the port.
///
/// With `corrupt`, reads return a different value than was stored.
pub fn spawn(corrupt: bool) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    thread::spawn(move || serve(stream, corrupt));
                }
                Err(_) => break,
            }
        }
    });

    port
}

fn serve(stream: TcpStream, corrupt: bool) {
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);
    let mut store: HashMap<String, Vec<u8>> = HashMap::new();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let parts: Vec<String> = line.split_whitespace().map(String::from).collect();
        if parts.is_empty() {
            continue;
        }

        let reply: Vec<u8> = match parts[0].as_str() {
            "set" => {
                let len: usize = parts[4].parse().unwrap();
                let mut block = vec![0u8; len + 2];
                reader.read_exact(&mut block).unwrap();
                block.truncate(len);
                store.insert(parts[1].clone(), block);
                b"STORED\r\n".to_vec()
            }
            "get" => match store.get(&parts[1]) {
                Some(value) => {
                    let body = if corrupt { b"wrong!".to_vec() } else { value.clone() };
                    let mut out = format!("VALUE {} 0 {}\r\n", parts[1], body.len()).into_bytes();
                    out.extend_from_slice(&body);
                    out.extend_from_slice(b"\r\nEND\r\n");
                    out
                }
                None => b"END\r\n".to_vec(),
            },
            "flush_all" => {
                store.clear();
                b"OK\r\n".to_vec()
            }
            _ => b"ERROR\r\n".to_vec(),
        };

        if writer.write_all(&reply).is_err() {
            return;
        }
    }
}
