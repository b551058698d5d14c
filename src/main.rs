// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Requests CLI - send one request through a throwaway session

use std::env;
use std::process::ExitCode;

use requests::{Method, RequestOptions};

#[derive(Debug)]
struct Invocation {
    method: Method,
    url: String,
    options: RequestOptions,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("requests=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None => {
            print_usage();
            ExitCode::from(1)
        }
        Some("--help" | "-h" | "help") => {
            print_usage();
            ExitCode::SUCCESS
        }
        Some("--version" | "-v" | "version") => {
            println!("requests {}", requests::VERSION);
            ExitCode::SUCCESS
        }
        Some(_) => match parse_args(&args) {
            Ok(invocation) => run(invocation),
            Err(msg) => {
                eprintln!("{}", msg);
                print_usage();
                ExitCode::from(1)
            }
        },
    }
}

fn print_usage() {
    println!(
        r#"Requests - blocking HTTP sessions

USAGE:
    requests <METHOD> <URL> [OPTIONS]

OPTIONS:
    -H <name:value>     Add a header
    -p <key=value>      Add a query parameter
    -d <key=value>      Add a form field
    -j <key=value>      Add a JSON string field (JSON wins over form fields)
    -f <key=path>       Add a multipart field from a file's contents
    -c <key=value>      Send a cookie
    --no-redirect       Do not follow redirects
    --insecure          Do not verify TLS certificates
    --proxy <url>       Send through a fixed proxy

EXAMPLES:
    requests GET https://httpbin.org/get -p q=rust
    requests POST https://httpbin.org/post -d name=value -H accept:application/json
    requests GET http://httpbin.org/redirect/3
"#
    );
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let method = Method::from_bytes(args[0].to_uppercase().as_bytes())
        .map_err(|_| format!("Invalid method: {}", args[0]))?;
    let url = args.get(1).ok_or("Missing URL")?.clone();

    let mut options = RequestOptions::new();
    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "--no-redirect" => options = options.redirect(false),
            "--insecure" => options = options.verify(false),
            "--proxy" => {
                let proxy = rest.next().ok_or("--proxy needs a value")?;
                options = options.proxy(proxy.as_str());
            }
            "-H" | "-p" | "-d" | "-j" | "-f" | "-c" => {
                let value = rest
                    .next()
                    .ok_or_else(|| format!("{} needs a value", flag))?;
                let sep = if flag == "-H" { ':' } else { '=' };
                let (key, val) = value
                    .split_once(sep)
                    .ok_or_else(|| format!("Expected key{}value, got {}", sep, value))?;
                let (key, val) = (key.trim(), val.trim());

                options = match flag.as_str() {
                    "-H" => options.header(key, val),
                    "-p" => options.param(key, val),
                    "-d" => options.data_field(key, val),
                    "-j" => {
                        let mut json = options.json.take().unwrap_or_default();
                        json.insert(key.to_string(), val.into());
                        options.json(json)
                    }
                    "-f" => {
                        let content = std::fs::read(val)
                            .map_err(|e| format!("Failed to read {}: {}", val, e))?;
                        options.file(key, content)
                    }
                    _ => options.cookie(key, val),
                };
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    Ok(Invocation {
        method,
        url,
        options,
    })
}

fn run(invocation: Invocation) -> ExitCode {
    let response = match requests::request(invocation.method, &invocation.url, invocation.options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Request failed: {}", e);
            return ExitCode::from(1);
        }
    };

    for hop in &response.history {
        println!("{} {}", hop.status, hop.url);
    }
    println!("{} {}", response.status, response.url);

    for (name, value) in response.headers.iter() {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    let cookies = response.cookies();
    if !cookies.is_empty() {
        println!();
        println!("Cookies:");
        for cookie in cookies {
            println!("  {}", cookie.to_header_value());
        }
    }

    println!();
    match response.text() {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to decode body: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let inv = parse_args(&args(&[
            "post",
            "http://example.com",
            "-H",
            "accept: text/plain",
            "-j",
            "a=1",
            "-j",
            "b=2",
            "--no-redirect",
        ]))
        .unwrap();

        assert_eq!(inv.method, Method::POST);
        assert_eq!(inv.options.headers.get("accept").unwrap(), "text/plain");
        assert_eq!(inv.options.json.as_ref().unwrap().len(), 2);
        assert_eq!(inv.options.redirect, Some(false));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["GET"])).is_err());
        assert!(parse_args(&args(&["GET", "http://x", "-d", "novalue"])).is_err());
        assert!(parse_args(&args(&["GET", "http://x", "--bogus"])).is_err());
    }
}
