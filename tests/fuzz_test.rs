/// Fuzzes the search by checking on many random mazes that it agrees with a breadth-first
/// search oracle and with the connected components, for both tie-breaking rules.
use grid_util::grid::ValueGrid;
use grid_util::point::Point;
use maze_pathfinding::{Cell, Maze, PathFinder, TieBreak};
use rand::prelude::*;
use std::collections::{HashSet, VecDeque};

fn random_maze(w: usize, h: usize, rng: &mut StdRng) -> Maze {
    let mut maze = Maze::new(w, h, Cell::Empty);
    for x in 0..maze.width() as i32 {
        for y in 0..maze.height() as i32 {
            if rng.gen_bool(0.35) {
                maze.set(x, y, Cell::Blocked);
            }
        }
    }
    maze.update();
    maze
}

fn random_open_point(maze: &Maze, rng: &mut StdRng) -> Point {
    loop {
        let p = Point::new(
            rng.gen_range(0..maze.width()) as i32,
            rng.gen_range(0..maze.height()) as i32,
        );
        if maze.passable(&p) {
            return p;
        }
    }
}

/// Distances from `start` to every cell reachable through open cells.
fn bfs_distances(maze: &Maze, start: Point) -> Vec<Vec<Option<i32>>> {
    let mut dist = vec![vec![None; maze.width()]; maze.height()];
    dist[start.y as usize][start.x as usize] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(p) = queue.pop_front() {
        let d = dist[p.y as usize][p.x as usize].unwrap();
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let n = Point::new(p.x + dx, p.y + dy);
            if maze.cell(&n).is_some_and(|c| c != Cell::Blocked)
                && dist[n.y as usize][n.x as usize].is_none()
            {
                dist[n.y as usize][n.x as usize] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    dist
}

fn visualize_maze(maze: &Maze, start: &Point, end: &Point) {
    let mut shown = maze.clone();
    shown.set(start.x, start.y, Cell::Start);
    shown.set(end.x, end.y, Cell::Goal);
    println!("{}", shown);
}

#[test]
fn fuzz_distance() {
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for tie_break in [TieBreak::Deepest, TieBreak::Insertion] {
        let solver = PathFinder { tie_break };
        for _ in 0..N_GRIDS {
            let maze = random_maze(9, 7, &mut rng);
            let start = random_open_point(&maze, &mut rng);
            let goal = random_open_point(&maze, &mut rng);
            let expected = bfs_distances(&maze, start)[goal.y as usize][goal.x as usize];
            let outcome = solver.search(&maze, start, goal).unwrap();
            if outcome.path.is_some() != expected.is_some() {
                visualize_maze(&maze, &start, &goal);
            }
            assert_eq!(outcome.path.is_some(), expected.is_some());
            assert_eq!(maze.reachable(&start, &goal), expected.is_some());

            let settled: HashSet<Point> = outcome.visited.iter().map(|s| s.position).collect();
            assert_eq!(settled.len(), outcome.visited.len());
            assert!(settled.iter().all(|p| maze.passable(p)));

            if let Some(result) = outcome.into_path_result() {
                assert_eq!(Some(result.cost), expected);
                assert_eq!(result.path.len() as i32, result.cost + 1);
                assert_eq!(result.path.first(), Some(&start));
                assert_eq!(result.path.last(), Some(&goal));
                assert!(result.is_contiguous());
                assert!(result.path.iter().all(|p| settled.contains(p)));
            }
        }
    }
}

#[test]
fn fuzz_unreachable_floods_component() {
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(1);
    let solver = PathFinder::new();
    let mut unreachable_cases = 0;
    for _ in 0..N_GRIDS {
        let maze = random_maze(8, 8, &mut rng);
        let start = random_open_point(&maze, &mut rng);
        let goal = random_open_point(&maze, &mut rng);
        if maze.reachable(&start, &goal) {
            continue;
        }
        unreachable_cases += 1;
        let outcome = solver.search(&maze, start, goal).unwrap();
        assert!(outcome.path.is_none());
        let component: HashSet<Point> = bfs_distances(&maze, start)
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, d)| d.is_some())
                    .map(move |(x, _)| Point::new(x as i32, y as i32))
            })
            .collect();
        let settled: HashSet<Point> = outcome.visited.iter().map(|s| s.position).collect();
        assert_eq!(settled.len(), outcome.visited.len());
        assert_eq!(settled, component);
    }
    assert!(unreachable_cases > 0);
}

#[test]
fn fuzz_mark_path_idempotent() {
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(2);
    let solver = PathFinder::new();
    for _ in 0..N_GRIDS {
        let maze = random_maze(10, 10, &mut rng);
        let start = random_open_point(&maze, &mut rng);
        let goal = random_open_point(&maze, &mut rng);
        if let Some(result) = solver.find_path(&maze, start, goal).unwrap() {
            let mut once = maze.clone();
            once.mark_path(&result.path).unwrap();
            let mut twice = once.clone();
            twice.mark_path(&result.path).unwrap();
            assert_eq!(once.to_string(), twice.to_string());
            for y in 0..maze.height() as i32 {
                for x in 0..maze.width() as i32 {
                    let p = Point::new(x, y);
                    let expected = if result.path.contains(&p) {
                        Cell::Path
                    } else {
                        maze.get(x, y)
                    };
                    assert_eq!(once.get(x, y), expected);
                }
            }
        }
    }
}
